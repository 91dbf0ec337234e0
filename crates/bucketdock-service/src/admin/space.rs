//! Requests for more storage space.

use std::sync::Arc;

use tracing::info;

use bucketdock_auth::{RequestContext, require_admin, require_user};
use bucketdock_backend::MetadataBackend;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::SpaceRequestId;
use bucketdock_entity::space_request::{CreateSpaceRequest, SpaceRequest, SpaceUnit};

use crate::feedback::Notifier;

/// Submits and reviews space requests.
#[derive(Debug, Clone)]
pub struct SpaceRequestService {
    backend: Arc<dyn MetadataBackend>,
    notifier: Arc<dyn Notifier>,
}

impl SpaceRequestService {
    /// Creates a new space request service.
    pub fn new(backend: Arc<dyn MetadataBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    /// Ask for `amount` more `unit`s of space.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        amount: f64,
        unit: SpaceUnit,
        reason: Option<String>,
    ) -> AppResult<SpaceRequest> {
        let user = require_user(ctx)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation("Requested space must be greater than zero"));
        }
        let requested_space = (amount * unit.multiplier() as f64).round() as i64;
        let request = CreateSpaceRequest {
            user_id: user,
            requested_space,
            reason: reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        };
        match self.backend.insert_space_request(&request).await {
            Ok(row) => {
                info!(user_id = %user, requested_space, "Space request submitted");
                self.notifier.success("Your request has been submitted.");
                Ok(row)
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to submit request: {}", e.message));
                Err(e)
            }
        }
    }

    /// The caller's own requests, newest first.
    pub async fn list_own(&self, ctx: &RequestContext) -> AppResult<Vec<SpaceRequest>> {
        let user = require_user(ctx)?;
        self.backend.list_space_requests(Some(user)).await
    }

    /// Every request, newest first.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<SpaceRequest>> {
        require_admin(ctx)?;
        self.backend.list_space_requests(None).await
    }

    /// Approve a request, raising the requester's limit.
    pub async fn approve(&self, ctx: &RequestContext, id: SpaceRequestId) -> AppResult<()> {
        require_admin(ctx)?;
        match self.backend.approve_space_request(id).await {
            Ok(()) => {
                info!(request_id = %id, "Space request approved");
                self.notifier.success("Request approved.");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to approve request: {}", e.message));
                Err(e)
            }
        }
    }

    /// Reject a request with notes for the requester.
    pub async fn reject(&self, ctx: &RequestContext, id: SpaceRequestId, notes: &str) -> AppResult<()> {
        require_admin(ctx)?;
        match self.backend.reject_space_request(id, notes.trim()).await {
            Ok(()) => {
                info!(request_id = %id, "Space request rejected");
                self.notifier.success("Request rejected.");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to reject request: {}", e.message));
                Err(e)
            }
        }
    }
}
