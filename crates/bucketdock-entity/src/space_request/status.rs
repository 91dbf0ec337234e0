//! Space request status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a space request. Only admin procedures move it out of
/// `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceRequestStatus {
    /// Waiting for an admin.
    #[default]
    Pending,
    /// Granted; the user's limit was raised.
    Approved,
    /// Declined.
    Rejected,
}

impl SpaceRequestStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether an admin has already acted on the request.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SpaceRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
