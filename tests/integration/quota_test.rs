//! Integration tests for quota and space requests.

use bucketdock_core::{AppError, ErrorKind};
use bucketdock_entity::space_request::{SpaceRequestStatus, SpaceUnit};
use bucketdock_service::UploadFile;

use crate::helpers::{ADMIN, OWNER, TestApp};

#[tokio::test]
async fn test_failed_adjustment_reverts_cached_usage() {
    let t = TestApp::signed_in(OWNER).await;
    t.backend
        .inject_failure("adjust_space_used", AppError::backend("rpc down"));

    let quota = t.app.quota();
    let err = quota.adjust(&t.app.ctx(), 500).await.unwrap_err();

    assert_eq!(err.message, "rpc down");
    assert_eq!(quota.cached().unwrap().used_bytes, 0);
    assert_eq!(t.space_used(), 0);
}

#[tokio::test]
async fn test_upload_then_quota_reflects_server_value() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    t.app
        .uploads()
        .unwrap()
        .upload(
            &t.app.ctx(),
            "photos",
            "",
            &[UploadFile::new("a.bin", vec![0u8; 2048])],
        )
        .await
        .unwrap();

    let current = t.app.quota().current(&t.app.ctx()).await.unwrap();
    assert_eq!(current.used_bytes, 2048);
    assert_eq!(t.space_used(), 2048);
}

#[tokio::test]
async fn test_space_request_approval_raises_limit() {
    let t = TestApp::signed_in(OWNER).await;
    let owner = t.backend.current_user().unwrap();
    let before = t.backend.profile(owner).unwrap().space_limit;

    let request = t
        .app
        .space_requests()
        .submit(&t.app.ctx(), 1.5, SpaceUnit::GB, Some("  raw photos ".into()))
        .await
        .unwrap();
    assert_eq!(request.requested_space, 1_610_612_736);
    assert_eq!(request.reason.as_deref(), Some("raw photos"));

    let err = t
        .app
        .space_requests()
        .approve(&t.app.ctx(), request.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    t.logout().await;
    t.login(ADMIN).await;
    t.app
        .space_requests()
        .approve(&t.app.ctx(), request.id)
        .await
        .unwrap();

    let after = t.backend.profile(owner).unwrap().space_limit;
    assert_eq!(after, before + 1_610_612_736);
    let all = t.app.space_requests().list_all(&t.app.ctx()).await.unwrap();
    assert_eq!(all[0].status, SpaceRequestStatus::Approved);
}

#[tokio::test]
async fn test_zero_space_request_is_rejected_locally() {
    let t = TestApp::signed_in(OWNER).await;
    let err = t
        .app
        .space_requests()
        .submit(&t.app.ctx(), 0.0, SpaceUnit::MB, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
