//! Auth session model.

use bucketdock_core::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in session issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for backend calls.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// When the access token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// Signed-in user.
    pub user_id: UserId,
    /// Signed-in user's email.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether this session came from a password-recovery link.
    #[serde(default)]
    pub is_recovery: bool,
}

impl AuthSession {
    /// Check if the access token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry() {
        let mut session = AuthSession {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user_id: UserId::new(),
            email: None,
            is_recovery: false,
        };
        assert!(!session.is_expired());
        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());
    }
}
