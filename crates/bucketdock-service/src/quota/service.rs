//! Quota accounting against the profile's `space_used` counter.
//!
//! The counter is changed only through the server-side
//! `adjust_space_used` procedure. The local profile is updated first so
//! the view reflects the change immediately, and reverted if the call
//! fails.

use std::sync::Arc;

use tracing::{debug, warn};

use bucketdock_auth::{ProfileStore, RequestContext, require_user};
use bucketdock_backend::MetadataBackend;
use bucketdock_core::result::AppResult;
use bucketdock_entity::storage::StorageQuota;

/// Keeps `space_used` in step with object mutations.
#[derive(Debug, Clone)]
pub struct QuotaService {
    backend: Arc<dyn MetadataBackend>,
    profiles: Arc<ProfileStore>,
}

impl QuotaService {
    /// Creates a new quota service.
    pub fn new(backend: Arc<dyn MetadataBackend>, profiles: Arc<ProfileStore>) -> Self {
        Self { backend, profiles }
    }

    /// Apply `delta` bytes to the caller's usage.
    ///
    /// Anonymous callers have no counter and are skipped.
    pub async fn adjust(&self, ctx: &RequestContext, delta: i64) -> AppResult<()> {
        if delta == 0 || !ctx.is_authenticated() {
            return Ok(());
        }
        let previous = self.profiles.apply_space_delta(delta);
        match self.backend.adjust_space_used(delta).await {
            Ok(()) => {
                debug!(user_id = ?ctx.user_id, delta, "Adjusted space usage");
                Ok(())
            }
            Err(e) => {
                warn!(user_id = ?ctx.user_id, delta, error = %e, "Space usage update failed");
                if let Some(previous) = previous {
                    self.profiles.restore_space_used(previous);
                }
                Err(e)
            }
        }
    }

    /// Quota from the locally held profile, if one is loaded.
    pub fn cached(&self) -> Option<StorageQuota> {
        self.profiles.profile().map(|p| p.quota())
    }

    /// Fetch the caller's profile and return its quota.
    pub async fn current(&self, ctx: &RequestContext) -> AppResult<StorageQuota> {
        let user = require_user(ctx)?;
        let profile = self.backend.get_profile(user).await?;
        let quota = profile.quota();
        self.profiles.set(Some(profile));
        Ok(quota)
    }
}
