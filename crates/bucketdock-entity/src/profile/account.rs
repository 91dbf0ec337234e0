//! Admin view of user accounts.

use bucketdock_core::types::UserId;
use serde::{Deserialize, Serialize};

use super::model::Profile;
use super::role::UserRole;

/// An auth user merged with its profile, as returned by `get-all-users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// User id.
    pub id: UserId,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Application role.
    #[serde(default)]
    pub role: UserRole,
    /// Whether the account may sign in.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Bytes in use.
    #[serde(default)]
    pub space_used: i64,
    /// Quota in bytes.
    #[serde(default)]
    pub space_limit: i64,
}

impl From<Profile> for UserAccount {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            email: p.email,
            full_name: p.full_name,
            role: p.role,
            is_active: p.is_active,
            space_used: p.space_used,
            space_limit: p.space_limit,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Body of the `invite-user` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserInvite {
    /// Address to invite.
    pub email: String,
    /// Role the new user receives.
    pub role: UserRole,
}
