//! Session store.

use tokio::sync::{broadcast, watch};

use bucketdock_entity::session::AuthSession;

use super::events::{AuthEvent, AuthSubscription, NavigationIntent};

/// Buffered auth events per subscriber.
const EVENT_BUFFER: usize = 16;

/// Current session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No auth event has been seen yet.
    #[default]
    Loading,
    /// Settled, with or without a session.
    Ready(Option<AuthSession>),
}

impl SessionState {
    /// The session, when settled and signed in.
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::Ready(session) => session.as_ref(),
            Self::Loading => None,
        }
    }

    /// Whether state is still loading.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Holds the current session and publishes auth events.
///
/// State lives in a `watch` channel so late readers always see the latest
/// value; events go out on a `broadcast` channel to every subscriber.
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    events: broadcast::Sender<AuthEvent>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store in the `Loading` state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self { state, events }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Current session, if signed in.
    pub fn session(&self) -> Option<AuthSession> {
        self.state.borrow().session().cloned()
    }

    /// Watch state changes.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Subscribe to auth events.
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.events.subscribe())
    }

    /// Apply an auth event: update state, then publish it.
    ///
    /// A `PasswordRecovery` event yields a navigation to
    /// `/update-password`.
    pub fn apply(&self, event: AuthEvent) -> Option<NavigationIntent> {
        let session = event.session().cloned();
        self.state.send_replace(SessionState::Ready(session));
        tracing::debug!(event = event.name(), "Auth state changed");

        let intent = match &event {
            AuthEvent::PasswordRecovery(_) => Some(NavigationIntent::to("/update-password")),
            _ => None,
        };
        // No subscribers is fine.
        let _ = self.events.send(event);
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_core::types::UserId;
    use chrono::{Duration, Utc};

    fn session() -> AuthSession {
        AuthSession {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user_id: UserId::new(),
            email: Some("u@x.com".into()),
            is_recovery: false,
        }
    }

    #[tokio::test]
    async fn test_loading_until_first_event() {
        let store = SessionStore::new();
        assert!(store.state().is_loading());
        store.apply(AuthEvent::InitialSession(None));
        assert_eq!(store.state(), SessionState::Ready(None));
    }

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let store = SessionStore::new();
        let mut sub = store.subscribe();
        let s = session();
        store.apply(AuthEvent::SignedIn(s.clone()));
        store.apply(AuthEvent::SignedOut);

        assert_eq!(sub.recv().await, Some(AuthEvent::SignedIn(s)));
        assert_eq!(sub.recv().await, Some(AuthEvent::SignedOut));
        assert!(store.session().is_none());
    }

    #[tokio::test]
    async fn test_recovery_navigates_to_update_password() {
        let store = SessionStore::new();
        let intent = store.apply(AuthEvent::PasswordRecovery(session()));
        assert_eq!(intent, Some(NavigationIntent::to("/update-password")));
        assert!(store.session().is_some());
    }

    #[tokio::test]
    async fn test_watchers_see_latest_state() {
        let store = SessionStore::new();
        let mut rx = store.watch();
        store.apply(AuthEvent::SignedIn(session()));
        rx.changed().await.unwrap();
        assert!(rx.borrow().session().is_some());
    }
}
