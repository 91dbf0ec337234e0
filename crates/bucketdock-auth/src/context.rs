//! Request context carrying the signed-in user and role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bucketdock_core::types::UserId;
use bucketdock_entity::profile::{Profile, UserRole};
use bucketdock_entity::session::AuthSession;

/// Snapshot of who is acting, passed into service methods.
///
/// Anonymous viewers of public buckets get a context with no user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The signed-in user's ID, if any.
    pub user_id: Option<UserId>,
    /// The signed-in user's email.
    pub email: Option<String>,
    /// The user's role from their profile (`User` when unknown).
    pub role: UserRole,
    /// When the context was built.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a signed-in user.
    pub fn new(user_id: UserId, email: Option<String>, role: UserRole) -> Self {
        Self {
            user_id: Some(user_id),
            email,
            role,
            request_time: Utc::now(),
        }
    }

    /// Context for a viewer who is not signed in.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            email: None,
            role: UserRole::User,
            request_time: Utc::now(),
        }
    }

    /// Build from the current session and profile.
    pub fn from_state(session: Option<&AuthSession>, profile: Option<&Profile>) -> Self {
        match session {
            Some(s) => Self::new(
                s.user_id,
                s.email.clone(),
                profile
                    .filter(|p| p.id == s.user_id)
                    .map_or(UserRole::User, |p| p.role),
            ),
            None => Self::anonymous(),
        }
    }

    /// Returns whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.user_id.is_some() && self.role.is_admin()
    }
}
