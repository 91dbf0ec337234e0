//! Share link generation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

use bucketdock_core::error::AppError;
use bucketdock_core::limits::MAX_PRESIGN_EXPIRY_SECS;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;

use super::expiry::ExpiryDuration;
use crate::feedback::Notifier;

/// A generated share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    /// Presigned GET URL.
    pub url: String,
    /// Lifetime in seconds.
    pub expires_in_secs: u64,
    /// When the link stops working.
    pub expires_at: DateTime<Utc>,
}

/// Generates time-limited links to single objects.
#[derive(Debug, Clone)]
pub struct ShareService {
    store: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(store: Arc<dyn ObjectStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Link to `key` valid for `expiry`.
    pub async fn share_link(
        &self,
        bucket: &str,
        key: &str,
        expiry: &ExpiryDuration,
    ) -> AppResult<ShareLink> {
        let secs = expiry.validate()?;
        self.share_link_secs(bucket, key, secs).await
    }

    /// Link to `key` valid for `secs` seconds, `0 < secs <= 604800`.
    pub async fn share_link_secs(&self, bucket: &str, key: &str, secs: u64) -> AppResult<ShareLink> {
        if secs == 0 || secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(AppError::validation(format!(
                "Expiration must be between 1 second and {MAX_PRESIGN_EXPIRY_SECS} seconds"
            )));
        }
        match self.store.presign_get(bucket, key, None, secs).await {
            Ok(url) => {
                info!(bucket, key, expires_in = secs, "Share link generated");
                self.notifier.success("Share link generated.");
                Ok(ShareLink {
                    url,
                    expires_in_secs: secs,
                    expires_at: Utc::now() + Duration::seconds(secs as i64),
                })
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to generate share link: {}", e.message));
                Err(e)
            }
        }
    }
}
