//! Admin-only user management.
//!
//! Every operation checks the admin role locally first; the backend
//! functions repeat the check with elevated privileges.

use std::sync::Arc;

use tracing::info;
use validator::ValidateEmail;

use bucketdock_auth::{RequestContext, require_admin};
use bucketdock_backend::MetadataBackend;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::UserId;
use bucketdock_entity::profile::{NewUserInvite, UpdateProfile, UserAccount, UserRole};

use crate::feedback::{LoadingToast, Notifier};

/// Admin dashboard operations.
#[derive(Debug, Clone)]
pub struct AdminService {
    backend: Arc<dyn MetadataBackend>,
    notifier: Arc<dyn Notifier>,
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(backend: Arc<dyn MetadataBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    /// Every account with its profile fields.
    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<UserAccount>> {
        require_admin(ctx)?;
        self.backend.get_all_users().await
    }

    /// Invite a new user by email.
    pub async fn invite_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        role: UserRole,
    ) -> AppResult<()> {
        require_admin(ctx)?;
        let email = email.trim();
        if !email.validate_email() {
            return Err(AppError::validation(format!("Invalid email address: {email}")));
        }
        let invite = NewUserInvite {
            email: email.to_string(),
            role,
        };
        let toast = LoadingToast::start(&self.notifier, "Sending invitation...");
        match self.backend.invite_user(&invite).await {
            Ok(()) => {
                info!(email, role = %role, "User invited");
                toast.succeed(&format!("Invitation sent to {email}."));
                Ok(())
            }
            Err(e) => Err(toast.fail("Failed to invite user", e)),
        }
    }

    /// Change a user's role, active flag or space limit.
    pub async fn edit_user(
        &self,
        ctx: &RequestContext,
        id: UserId,
        update: &UpdateProfile,
    ) -> AppResult<()> {
        require_admin(ctx)?;
        if update.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        if update.space_limit.is_some_and(|limit| limit < 0) {
            return Err(AppError::validation("Space limit cannot be negative"));
        }
        match self.backend.update_profile(id, update).await {
            Ok(()) => {
                info!(user_id = %id, ?update, "User updated");
                self.notifier.success("User updated successfully.");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Failed to update user: {}", e.message));
                Err(e)
            }
        }
    }

    /// Delete a user account.
    pub async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> AppResult<()> {
        require_admin(ctx)?;
        if ctx.user_id == Some(id) {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        let toast = LoadingToast::start(&self.notifier, "Deleting user...");
        match self.backend.delete_user(id).await {
            Ok(()) => {
                info!(user_id = %id, "User deleted");
                toast.succeed("User deleted successfully.");
                Ok(())
            }
            Err(e) => Err(toast.fail("Failed to delete user", e)),
        }
    }

    /// Bytes used across all accounts.
    pub async fn total_used_space(&self, ctx: &RequestContext) -> AppResult<i64> {
        require_admin(ctx)?;
        self.backend.get_total_used_space().await
    }
}
