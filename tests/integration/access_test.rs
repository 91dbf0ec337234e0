//! Integration tests for bucket membership.

use bucketdock_core::ErrorKind;
use bucketdock_entity::member::MemberRole;
use bucketdock_entity::profile::UserRole;

use crate::helpers::{GUEST, OWNER, TestApp};

#[tokio::test]
async fn test_invite_parses_mixed_separators_and_skips_invalid() {
    let t = TestApp::signed_in(OWNER).await;
    let bucket = t.create_bucket("photos").await;
    t.backend.add_user("a@x.com", "secret1", UserRole::User);
    t.backend.add_user("b@x.com", "secret1", UserRole::User);

    let report = t
        .app
        .access()
        .invite(&t.app.ctx(), &bucket, "a@x.com, b@x.com; bad", MemberRole::ReadOnly)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.invited(), 2);
    assert_eq!(report.skipped, vec!["bad".to_string()]);
    assert_eq!(t.backend.calls_named("invite_user_to_bucket").len(), 2);
    assert!(t.notifier.errors().iter().any(|m| m.contains("bad")));
}

#[tokio::test]
async fn test_one_failed_invite_does_not_stop_the_rest() {
    let t = TestApp::signed_in(OWNER).await;
    let bucket = t.create_bucket("photos").await;

    let report = t
        .app
        .access()
        .invite(
            &t.app.ctx(),
            &bucket,
            &format!("nobody@x.com\n{GUEST}"),
            MemberRole::ReadWrite,
        )
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes[0].error.is_some());
    assert!(report.outcomes[1].error.is_none());
    assert_eq!(report.invited(), 1);
}

#[tokio::test]
async fn test_member_roles_drive_bucket_access() {
    let t = TestApp::signed_in(OWNER).await;
    let bucket = t.create_bucket("photos").await;
    t.app
        .access()
        .invite(&t.app.ctx(), &bucket, GUEST, MemberRole::ReadOnly)
        .await
        .unwrap();
    t.logout().await;
    t.login(GUEST).await;

    let (_, access) = t.app.open_bucket("photos").await.unwrap();
    assert!(access.can_read);
    assert!(!access.can_write);
    assert_eq!(
        access.require_write().unwrap_err().kind,
        ErrorKind::Authorization
    );

    let members = t.app.access().members(&bucket).await.unwrap();
    let guest = members.iter().find(|m| m.email == GUEST).unwrap().user_id;
    let err = t
        .app
        .access()
        .change_role(&bucket, guest, MemberRole::ReadWrite)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    t.logout().await;
    t.login(OWNER).await;
    t.app
        .access()
        .change_role(&bucket, guest, MemberRole::ReadWrite)
        .await
        .unwrap();
    t.app.access().remove(&bucket, guest).await.unwrap();
    let members = t.app.access().members(&bucket).await.unwrap();
    assert!(members.iter().all(|m| m.email != GUEST));
}

#[tokio::test]
async fn test_private_bucket_is_hidden_from_strangers() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    t.logout().await;
    t.login(GUEST).await;

    let err = t.app.open_bucket("photos").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
