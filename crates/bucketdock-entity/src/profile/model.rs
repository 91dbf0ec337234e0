//! Profile entity model.

use bucketdock_core::types::UserId;
use serde::{Deserialize, Serialize};

use super::role::UserRole;
use crate::storage::StorageQuota;

/// A row of the `profiles` table.
///
/// `space_used` is maintained by the `adjust_space_used` procedure and is
/// only eventually consistent with the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Same id as the auth user.
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Application role.
    #[serde(default)]
    pub role: UserRole,
    /// Whether the account may sign in.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Quota in bytes.
    #[serde(default)]
    pub space_limit: i64,
    /// Bytes currently accounted to the user.
    #[serde(default)]
    pub space_used: i64,
}

impl Profile {
    /// Check if this profile has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The profile's quota as a value object.
    pub fn quota(&self) -> StorageQuota {
        StorageQuota::new(Some(self.space_limit), self.space_used)
    }
}

/// Fields an admin may change on a profile. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// New quota in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_limit: Option<i64>,
}

impl UpdateProfile {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.is_active.is_none() && self.space_limit.is_none()
    }
}

fn default_true() -> bool {
    true
}
