//! Role checks for admin-only and signed-in-only operations.

use bucketdock_core::error::AppError;
use bucketdock_core::types::UserId;

use crate::context::RequestContext;

/// Checks that the caller is a signed-in admin.
pub fn require_admin(ctx: &RequestContext) -> Result<(), AppError> {
    if !ctx.is_authenticated() {
        return Err(AppError::authentication("Sign in required"));
    }
    if !ctx.is_admin() {
        return Err(AppError::authorization("Admin access required"));
    }
    Ok(())
}

/// Checks that a user is signed in and returns their id.
pub fn require_user(ctx: &RequestContext) -> Result<UserId, AppError> {
    ctx.user_id
        .ok_or_else(|| AppError::authentication("Sign in required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_core::ErrorKind;
    use bucketdock_entity::profile::UserRole;

    #[test]
    fn test_require_admin() {
        let admin = RequestContext::new(UserId::new(), None, UserRole::Admin);
        let user = RequestContext::new(UserId::new(), None, UserRole::User);
        assert!(require_admin(&admin).is_ok());
        assert_eq!(
            require_admin(&user).unwrap_err().kind,
            ErrorKind::Authorization
        );
        assert_eq!(
            require_admin(&RequestContext::anonymous()).unwrap_err().kind,
            ErrorKind::Authentication
        );
    }
}
