//! Integration tests for sign-in, sessions and password recovery.

use std::sync::Arc;

use bucketdock_cli::App;
use bucketdock_core::ErrorKind;
use bucketdock_core::traits::ObjectStore;
use bucketdock_entity::profile::UserRole;
use bucketdock_service::Notifier;

use crate::helpers::{GUEST, OWNER, PASSWORD, TestApp};

#[tokio::test]
async fn test_session_survives_restart() {
    let t = TestApp::signed_in(OWNER).await;
    t.app.persist_session().await.unwrap();

    let store: Arc<dyn ObjectStore> = t.store.clone();
    let notifier: Arc<dyn Notifier> = t.notifier.clone();
    let restarted = App::from_parts(
        t.app.config().clone(),
        Ok(store),
        t.backend.clone(),
        t.backend.clone(),
        notifier,
    );
    assert!(restarted.auth().sessions().state().is_loading());
    restarted.restore_session().await.unwrap();

    let ctx = restarted.ctx();
    assert!(ctx.is_authenticated());
    assert_eq!(
        restarted.auth().profiles().profile().unwrap().email.as_deref(),
        Some(OWNER)
    );
}

#[tokio::test]
async fn test_logout_removes_persisted_session() {
    let t = TestApp::signed_in(OWNER).await;
    t.app.persist_session().await.unwrap();
    assert!(t.app.config().session.file.exists());

    t.logout().await;
    t.app.persist_session().await.unwrap();
    assert!(!t.app.config().session.file.exists());
    assert!(!t.app.ctx().is_authenticated());
}

#[tokio::test]
async fn test_wrong_password_is_authentication_error() {
    let t = TestApp::new().await;
    let err = t.app.auth().sign_in(OWNER, "nope").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(!t.app.ctx().is_authenticated());
}

#[tokio::test]
async fn test_deactivated_account_cannot_sign_in() {
    let t = TestApp::new().await;
    let guest = t.backend.add_user("off@x.com", PASSWORD, UserRole::User);
    t.backend.edit_profile(guest, |p| p.is_active = false);

    let err = t.app.auth().sign_in("off@x.com", PASSWORD).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(t.backend.current_user().is_none());
    assert!(t.app.auth().sessions().session().is_none());
}

#[tokio::test]
async fn test_forgot_password_uses_configured_redirect() {
    let t = TestApp::new().await;
    t.app.auth().forgot_password(GUEST).await.unwrap();
    assert_eq!(t.backend.password_resets().len(), 1);
    assert_eq!(t.backend.password_resets()[0].0, GUEST);
}

#[tokio::test]
async fn test_update_password_then_sign_in_with_it() {
    let t = TestApp::signed_in(GUEST).await;
    let err = t.app.auth().update_password("short").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    t.app.auth().update_password("longer-secret").await.unwrap();
    t.logout().await;
    t.app.auth().sign_in(GUEST, "longer-secret").await.unwrap();
    assert!(t.app.ctx().is_authenticated());
}
