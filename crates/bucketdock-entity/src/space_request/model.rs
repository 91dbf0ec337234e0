//! Space request model.

use bucketdock_core::types::{SpaceRequestId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::status::SpaceRequestStatus;

/// A row of the `space_requests` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRequest {
    /// Request id.
    pub id: SpaceRequestId,
    /// Requesting user.
    pub user_id: UserId,
    /// Additional bytes requested.
    pub requested_space: i64,
    /// Free-text justification.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current status.
    #[serde(default)]
    pub status: SpaceRequestStatus,
    /// Notes left by the reviewing admin.
    #[serde(default)]
    pub admin_notes: Option<String>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// Requester email, when joined from profiles.
    #[serde(default)]
    pub email: Option<String>,
}

/// Data required to submit a space request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpaceRequest {
    /// Requesting user.
    pub user_id: UserId,
    /// Additional bytes requested.
    pub requested_space: i64,
    /// Optional justification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Units accepted when requesting space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceUnit {
    /// Mebibytes.
    MB,
    /// Gibibytes.
    #[default]
    GB,
}

impl SpaceUnit {
    /// Bytes per unit.
    pub fn multiplier(&self) -> i64 {
        match self {
            Self::MB => 1024 * 1024,
            Self::GB => 1024 * 1024 * 1024,
        }
    }
}

impl fmt::Display for SpaceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MB => write!(f, "MB"),
            Self::GB => write!(f, "GB"),
        }
    }
}

impl FromStr for SpaceUnit {
    type Err = bucketdock_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MB" => Ok(Self::MB),
            "GB" => Ok(Self::GB),
            _ => Err(bucketdock_core::AppError::validation(format!(
                "Invalid unit: '{s}'. Expected MB or GB"
            ))),
        }
    }
}
