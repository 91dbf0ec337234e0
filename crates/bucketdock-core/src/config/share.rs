//! Share link and presigned URL configuration.

use serde::{Deserialize, Serialize};

/// Expiry settings for presigned URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Default share link lifetime in minutes.
    #[serde(default = "default_link_minutes")]
    pub default_link_minutes: u64,
    /// Expiry of preview and download URLs, in seconds.
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_secs: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_link_minutes: default_link_minutes(),
            presign_expiry_secs: default_presign_expiry(),
        }
    }
}

fn default_link_minutes() -> u64 {
    15
}

fn default_presign_expiry() -> u64 {
    3600
}
