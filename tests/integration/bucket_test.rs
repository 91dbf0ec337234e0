//! Integration tests for bucket lifecycle.

use clap::Parser;

use bucketdock_cli::Cli;
use bucketdock_core::ErrorKind;
use bucketdock_storage::MemoryObjectStore;
use bucketdock_storage::providers::StoreOp;

use crate::helpers::{GUEST, OWNER, TestApp};

#[tokio::test]
async fn test_create_bucket_is_versioned_and_recorded() {
    let t = TestApp::signed_in(OWNER).await;
    let bucket = t.create_bucket("photos").await;

    assert!(t.store.is_versioned("photos"));
    assert_eq!(t.backend.bucket_rows(), vec![bucket]);
    assert!(
        t.notifier
            .successes()
            .iter()
            .any(|m| m.contains("photos"))
    );
}

#[tokio::test]
async fn test_invalid_bucket_name_touches_nothing() {
    let t = TestApp::signed_in(OWNER).await;
    let err = t
        .app
        .buckets()
        .unwrap()
        .create(&t.app.ctx(), "Bad_Name")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(t.store.operations().is_empty());
    assert!(t.backend.bucket_rows().is_empty());
}

#[tokio::test]
async fn test_delete_drains_every_version_before_deleting_bucket() {
    let t = TestApp::signed_in(OWNER).await;
    let bucket = t.create_bucket("photos").await;
    t.put("photos", "a.txt", 10).await;
    t.put("photos", "a.txt", 20).await;
    t.put("photos", "docs/b.txt", 5).await;
    t.app
        .deletes()
        .unwrap()
        .delete_object(&t.app.ctx(), "photos", "docs/b.txt", 5)
        .await
        .unwrap();
    assert!(t.store.version_count("photos") >= 4);

    let report = t
        .app
        .buckets()
        .unwrap()
        .delete(&t.app.ctx(), &bucket)
        .await
        .unwrap();

    assert_eq!(report.removed, 4);
    let delete_call = t
        .store
        .operations()
        .into_iter()
        .find(|op| matches!(op, StoreOp::DeleteBucket { .. }))
        .unwrap();
    assert_eq!(
        delete_call,
        StoreOp::DeleteBucket {
            bucket: "photos".into(),
            remaining_versions: 0,
        }
    );
    assert!(!t.store.has_bucket("photos"));
    assert!(t.backend.bucket_rows().is_empty());
}

#[tokio::test]
async fn test_drain_chunks_large_buckets() {
    let t = TestApp::with_store(MemoryObjectStore::new().with_page_size(1000)).await;
    t.login(OWNER).await;
    let bucket = t.create_bucket("archive").await;
    for i in 0..2500 {
        t.put("archive", &format!("k{i:04}"), 1).await;
    }

    let report = t
        .app
        .buckets()
        .unwrap()
        .delete(&t.app.ctx(), &bucket)
        .await
        .unwrap();

    let sizes = t.store.batch_sizes();
    assert!(sizes.iter().all(|&n| n <= 1000), "{sizes:?}");
    assert_eq!(sizes.iter().sum::<usize>(), 2500);
    assert_eq!(report.removed, 2500);
    assert!(!t.store.has_bucket("archive"));
}

#[tokio::test]
async fn test_only_owner_can_delete_bucket() {
    let t = TestApp::signed_in(OWNER).await;
    let bucket = t.create_bucket("photos").await;
    t.logout().await;
    t.login(GUEST).await;

    let err = t
        .app
        .buckets()
        .unwrap()
        .delete(&t.app.ctx(), &bucket)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(t.store.has_bucket("photos"));
}

#[tokio::test]
async fn test_cli_bucket_commands() {
    let t = TestApp::signed_in(OWNER).await;
    let run = |args: &[&str]| {
        let mut argv = vec!["bucketdock", "--yes"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    };

    run(&["buckets", "create", "photos"])
        .dispatch(&t.app)
        .await
        .unwrap();
    run(&["buckets", "visibility", "photos", "read-only"])
        .dispatch(&t.app)
        .await
        .unwrap();
    assert_eq!(
        t.backend.bucket_rows()[0].public_level.as_str(),
        "read-only"
    );

    run(&["buckets", "delete", "photos"])
        .dispatch(&t.app)
        .await
        .unwrap();
    assert!(t.backend.bucket_rows().is_empty());
}
