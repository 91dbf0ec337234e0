//! Profile store.

use tokio::sync::watch;

use bucketdock_entity::profile::Profile;

/// Current profile state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileState {
    /// Waiting for the profile fetch that follows a session change.
    #[default]
    Loading,
    /// Settled, with or without a profile.
    Ready(Option<Profile>),
}

impl ProfileState {
    /// The profile, when settled.
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Ready(profile) => profile.as_ref(),
            Self::Loading => None,
        }
    }

    /// Whether state is still loading.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Holds the signed-in user's profile.
#[derive(Debug)]
pub struct ProfileStore {
    state: watch::Sender<ProfileState>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    /// Create a store in the `Loading` state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(ProfileState::Loading);
        Self { state }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    /// Current profile, if loaded.
    pub fn profile(&self) -> Option<Profile> {
        self.state.borrow().profile().cloned()
    }

    /// Watch state changes.
    pub fn watch(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    /// Mark the profile as being refetched.
    pub fn set_loading(&self) {
        self.state.send_replace(ProfileState::Loading);
    }

    /// Replace the profile.
    pub fn set(&self, profile: Option<Profile>) {
        self.state.send_replace(ProfileState::Ready(profile));
    }

    /// Add `delta` to the local `space_used` counter.
    ///
    /// Returns the previous value, or `None` when no profile is loaded.
    pub fn apply_space_delta(&self, delta: i64) -> Option<i64> {
        let mut previous = None;
        self.state.send_if_modified(|state| match state {
            ProfileState::Ready(Some(profile)) => {
                previous = Some(profile.space_used);
                profile.space_used = (profile.space_used + delta).max(0);
                true
            }
            _ => false,
        });
        previous
    }

    /// Put `space_used` back to `value`.
    pub fn restore_space_used(&self, value: i64) {
        self.state.send_if_modified(|state| match state {
            ProfileState::Ready(Some(profile)) => {
                profile.space_used = value;
                true
            }
            _ => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_core::types::UserId;
    use bucketdock_entity::profile::UserRole;

    fn profile(used: i64) -> Profile {
        Profile {
            id: UserId::new(),
            full_name: None,
            email: None,
            role: UserRole::User,
            is_active: true,
            space_limit: 1000,
            space_used: used,
        }
    }

    #[test]
    fn test_apply_and_restore() {
        let store = ProfileStore::new();
        assert_eq!(store.apply_space_delta(10), None);

        store.set(Some(profile(100)));
        assert_eq!(store.apply_space_delta(-40), Some(100));
        assert_eq!(store.profile().unwrap().space_used, 60);
        store.restore_space_used(100);
        assert_eq!(store.profile().unwrap().space_used, 100);
    }
}
