//! Integration tests for user administration.

use bucketdock_core::ErrorKind;
use bucketdock_entity::profile::{UpdateProfile, UserRole};

use crate::helpers::{ADMIN, GUEST, OWNER, TestApp};

#[tokio::test]
async fn test_admin_functions_require_admin() {
    let t = TestApp::signed_in(OWNER).await;
    let err = t.app.admin().list_users(&t.app.ctx()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(t.backend.calls_named("get-all-users").is_empty());
}

#[tokio::test]
async fn test_admin_edits_and_deletes_users() {
    let t = TestApp::signed_in(ADMIN).await;
    let admin = t.app.admin();
    let ctx = t.app.ctx();

    let users = admin.list_users(&ctx).await.unwrap();
    assert_eq!(users.len(), 3);
    let guest = users
        .iter()
        .find(|u| u.email.as_deref() == Some(GUEST))
        .unwrap()
        .id;

    admin
        .edit_user(
            &ctx,
            guest,
            &UpdateProfile {
                role: Some(UserRole::Admin),
                space_limit: Some(5 * 1024 * 1024 * 1024),
                ..UpdateProfile::default()
            },
        )
        .await
        .unwrap();
    let profile = t.backend.profile(guest).unwrap();
    assert!(profile.is_admin());
    assert_eq!(profile.space_limit, 5 * 1024 * 1024 * 1024);

    let err = admin
        .edit_user(&ctx, guest, &UpdateProfile::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    admin.delete_user(&ctx, guest).await.unwrap();
    assert!(t.backend.profile(guest).is_none());
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let t = TestApp::signed_in(ADMIN).await;
    let me = t.app.ctx().user_id.unwrap();
    let err = t.app.admin().delete_user(&t.app.ctx(), me).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_invite_user_validates_email() {
    let t = TestApp::signed_in(ADMIN).await;
    let err = t
        .app
        .admin()
        .invite_user(&t.app.ctx(), "not-an-email", UserRole::User)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    t.app
        .admin()
        .invite_user(&t.app.ctx(), "new@x.com", UserRole::User)
        .await
        .unwrap();
    assert_eq!(t.backend.calls_named("invite-user").len(), 1);
}
