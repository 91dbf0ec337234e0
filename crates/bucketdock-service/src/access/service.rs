//! Member listing, invitations, role changes and removal.
//!
//! All calls go through remote procedures that enforce ownership
//! server-side.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use bucketdock_auth::{RequestContext, require_user};
use bucketdock_backend::MetadataBackend;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::UserId;
use bucketdock_entity::bucket::Bucket;
use bucketdock_entity::member::{BucketMember, MemberRole};

use super::invite::parse_invite_emails;
use crate::feedback::{LoadingToast, Notifier};

/// Outcome of inviting one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteOutcome {
    /// The address.
    pub email: String,
    /// The server's error message, if the invite failed.
    pub error: Option<String>,
}

impl InviteOutcome {
    /// Whether the invite went through.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a bulk invite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InviteReport {
    /// One entry per attempted address, in order.
    pub outcomes: Vec<InviteOutcome>,
    /// Entries skipped as malformed.
    pub skipped: Vec<String>,
}

impl InviteReport {
    /// Number of successful invites.
    pub fn invited(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }
}

/// Manages who can access a bucket.
#[derive(Debug, Clone)]
pub struct AccessService {
    backend: Arc<dyn MetadataBackend>,
    notifier: Arc<dyn Notifier>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(backend: Arc<dyn MetadataBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    /// Owner and members of `bucket`.
    pub async fn members(&self, bucket: &Bucket) -> AppResult<Vec<BucketMember>> {
        self.backend.get_bucket_members(bucket.id).await
    }

    /// The caller's role in `bucket`, if any.
    pub async fn membership(
        &self,
        ctx: &RequestContext,
        bucket: &Bucket,
    ) -> AppResult<Option<MemberRole>> {
        let Some(user) = ctx.user_id else {
            return Ok(None);
        };
        if bucket.is_owned_by(&user) {
            return Ok(Some(MemberRole::Owner));
        }
        match self.members(bucket).await {
            Ok(members) => Ok(members.iter().find(|m| m.user_id == user).map(|m| m.role)),
            Err(e) if e.kind == bucketdock_core::ErrorKind::Authorization => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Invite every address in `input` with `role`, one at a time.
    ///
    /// Each outcome is captured individually; a failed invite does not stop
    /// the ones after it.
    pub async fn invite(
        &self,
        ctx: &RequestContext,
        bucket: &Bucket,
        input: &str,
        role: MemberRole,
    ) -> AppResult<InviteReport> {
        require_user(ctx)?;
        let list = parse_invite_emails(input);
        if list.valid.is_empty() {
            let message = if list.skipped.is_empty() {
                "Enter at least one email address".to_string()
            } else {
                format!("No valid email addresses (skipped: {})", list.skipped.join(", "))
            };
            return Err(AppError::validation(message));
        }

        let mut report = InviteReport {
            skipped: list.skipped,
            ..InviteReport::default()
        };
        let toast = LoadingToast::start(
            &self.notifier,
            &format!("Inviting {} user(s)...", list.valid.len()),
        );
        for email in list.valid {
            let error = match self
                .backend
                .invite_user_to_bucket(bucket.id, &email, role)
                .await
            {
                Ok(()) => {
                    info!(bucket = %bucket.name, email = %email, role = role.as_str(), "Member invited");
                    None
                }
                Err(e) => {
                    warn!(bucket = %bucket.name, email = %email, error = %e, "Invite failed");
                    Some(e.message)
                }
            };
            report.outcomes.push(InviteOutcome { email, error });
        }
        toast.finish();

        for outcome in &report.outcomes {
            match &outcome.error {
                None => self.notifier.success(&format!("Invited {}.", outcome.email)),
                Some(error) => self
                    .notifier
                    .error(&format!("Failed to invite {}: {error}", outcome.email)),
            }
        }
        if !report.skipped.is_empty() {
            self.notifier.error(&format!(
                "Skipped invalid email(s): {}",
                report.skipped.join(", ")
            ));
        }
        Ok(report)
    }

    /// Change a member's role.
    pub async fn change_role(
        &self,
        bucket: &Bucket,
        member: UserId,
        role: MemberRole,
    ) -> AppResult<()> {
        if role == MemberRole::Owner {
            return Err(AppError::validation("Ownership cannot be transferred"));
        }
        match self
            .backend
            .update_bucket_member_role(bucket.id, member, role)
            .await
        {
            Ok(()) => {
                info!(bucket = %bucket.name, member = %member, role = role.as_str(), "Member role changed");
                self.notifier.success("Role updated.");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to update role: {}", e.message));
                Err(e)
            }
        }
    }

    /// Remove a member. Returns the server's confirmation message.
    pub async fn remove(&self, bucket: &Bucket, member: UserId) -> AppResult<String> {
        match self.backend.remove_bucket_member(bucket.id, member).await {
            Ok(message) => {
                info!(bucket = %bucket.name, member = %member, "Member removed");
                self.notifier.success(&message);
                Ok(message)
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to remove member: {}", e.message));
                Err(e)
            }
        }
    }
}
