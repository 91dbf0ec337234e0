//! Integration tests for share links.

use bucketdock_core::ErrorKind;
use bucketdock_service::ExpiryDuration;
use bucketdock_storage::providers::StoreOp;

use crate::helpers::{OWNER, TestApp};

async fn setup() -> TestApp {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    t.put("photos", "cat.png", 10).await;
    t.store.clear_operations();
    t
}

#[tokio::test]
async fn test_seven_days_is_the_longest_link() {
    let t = setup().await;
    let shares = t.app.shares().unwrap();

    let link = shares
        .share_link("photos", "cat.png", &ExpiryDuration::new(7, 0, 0))
        .await
        .unwrap();
    assert_eq!(link.expires_in_secs, 604_800);

    let err = shares
        .share_link_secs("photos", "cat.png", 604_801)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = shares
        .share_link("photos", "cat.png", &ExpiryDuration::new(0, 0, 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let presigned: Vec<u64> = t
        .store
        .operations()
        .into_iter()
        .filter_map(|op| match op {
            StoreOp::PresignGet {
                expires_in_secs, ..
            } => Some(expires_in_secs),
            _ => None,
        })
        .collect();
    assert_eq!(presigned, vec![604_800]);
}

#[tokio::test]
async fn test_default_link_lasts_fifteen_minutes() {
    let t = setup().await;
    let link = t
        .app
        .shares()
        .unwrap()
        .share_link("photos", "cat.png", &ExpiryDuration::default())
        .await
        .unwrap();
    assert_eq!(link.expires_in_secs, 900);
    assert!(link.url.contains("cat.png"));
}

#[tokio::test]
async fn test_out_of_range_fields_are_rejected() {
    let t = setup().await;
    let shares = t.app.shares().unwrap();
    for expiry in [ExpiryDuration::new(0, 24, 0), ExpiryDuration::new(0, 0, 60)] {
        let err = shares
            .share_link("photos", "cat.png", &expiry)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{expiry:?}");
    }
    assert!(t.store.operations().is_empty());
}
