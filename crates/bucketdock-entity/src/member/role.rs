//! Member role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user can hold on a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberRole {
    /// Bucket owner.
    Owner,
    /// Can upload and delete.
    ReadWrite,
    /// Can list and download.
    #[default]
    ReadOnly,
}

impl MemberRole {
    /// Whether this role may modify objects.
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Owner | Self::ReadWrite)
    }

    /// Return the role as stored by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::ReadWrite => "read-write",
            Self::ReadOnly => "read-only",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = bucketdock_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "read-write" => Ok(Self::ReadWrite),
            "read-only" => Ok(Self::ReadOnly),
            _ => Err(bucketdock_core::AppError::validation(format!(
                "Invalid member role: '{s}'. Expected one of: read-only, read-write"
            ))),
        }
    }
}
