//! Integration tests for upload, browse and delete.

use clap::Parser;

use bucketdock_cli::Cli;
use bucketdock_core::AppError;
use bucketdock_core::ErrorKind;
use bucketdock_service::UploadFile;
use bucketdock_service::object::SelectionItem;
use bucketdock_storage::providers::StoreOperation;

use crate::helpers::{OWNER, TestApp};

fn file(path: &str, size: usize) -> UploadFile {
    UploadFile::new(path, vec![b'x'; size])
}

async fn upload(t: &TestApp, bucket: &str, prefix: &str, files: &[UploadFile]) {
    t.app
        .uploads()
        .unwrap()
        .upload(&t.app.ctx(), bucket, prefix, files)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_charges_quota_and_lists_folders() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    upload(
        &t,
        "photos",
        "",
        &[file("album/cat.png", 300), file("notes.txt", 50)],
    )
    .await;

    assert_eq!(t.space_used(), 350);
    assert_eq!(t.app.auth().profiles().profile().unwrap().space_used, 350);

    let listing = t
        .app
        .browse()
        .unwrap()
        .list_page("photos", "", None)
        .await
        .unwrap();
    assert_eq!(listing.folders, vec!["album/".to_string()]);
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].key, "notes.txt");
}

#[tokio::test]
async fn test_upload_over_quota_is_rejected_before_writing() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    let user = t.backend.current_user().unwrap();
    t.backend.edit_profile(user, |p| p.space_limit = 100);
    t.app.auth().refresh_profile().await.unwrap();
    t.store.clear_operations();

    let err = t
        .app
        .uploads()
        .unwrap()
        .upload(&t.app.ctx(), "photos", "", &[file("big.bin", 101)])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(t.store.operations().is_empty());
    assert_eq!(t.space_used(), 0);
}

#[tokio::test]
async fn test_multi_select_delete_ends_at_before_minus_selection() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    upload(
        &t,
        "photos",
        "",
        &[
            file("a.txt", 100),
            file("b.txt", 200),
            file("docs/c.txt", 40),
            file("docs/d.txt", 60),
            file("keep.txt", 7),
        ],
    )
    .await;
    let before = t.space_used();

    let outcome = t
        .app
        .deletes()
        .unwrap()
        .delete_selection(
            &t.app.ctx(),
            "photos",
            &[
                SelectionItem::File {
                    key: "a.txt".into(),
                    size: 100,
                },
                SelectionItem::File {
                    key: "b.txt".into(),
                    size: 200,
                },
                SelectionItem::Folder {
                    prefix: "docs/".into(),
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcome.bytes, 400);
    assert!(outcome.quota_synced);
    assert_eq!(t.space_used(), before - 400);
    assert_eq!(t.store.current_keys("photos"), vec!["keep.txt".to_string()]);
    assert_eq!(t.backend.calls_named("adjust_space_used").len(), 2);
}

#[tokio::test]
async fn test_empty_folder_delete_issues_no_batch() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;

    let outcome = t
        .app
        .deletes()
        .unwrap()
        .delete_folder(&t.app.ctx(), "photos", "nothing-here/")
        .await
        .unwrap();

    assert_eq!(outcome.deleted, 0);
    assert!(t.store.batch_sizes().is_empty());
    assert!(t.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_quota_failure_after_delete_is_reported_not_raised() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    upload(&t, "photos", "", &[file("a.txt", 100)]).await;
    t.backend
        .inject_failure("adjust_space_used", AppError::backend("rpc down"));

    let outcome = t
        .app
        .deletes()
        .unwrap()
        .delete_object(&t.app.ctx(), "photos", "a.txt", 100)
        .await
        .unwrap();

    assert!(!outcome.quota_synced);
    assert!(t.store.current_keys("photos").is_empty());
    assert!(
        t.notifier
            .errors()
            .iter()
            .any(|m| m.starts_with("Deleted, but failed to update space usage"))
    );
    assert_eq!(t.app.auth().profiles().profile().unwrap().space_used, 100);
}

#[tokio::test]
async fn test_failed_batch_leaves_quota_untouched() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    upload(&t, "photos", "docs/", &[file("a.txt", 10), file("b.txt", 20)]).await;
    t.store
        .inject_failure(StoreOperation::DeleteObjects, AppError::storage("denied"));

    let err = t
        .app
        .deletes()
        .unwrap()
        .delete_folder(&t.app.ctx(), "photos", "docs/")
        .await
        .unwrap_err();

    assert_eq!(err.message, "denied");
    assert_eq!(t.space_used(), 30);
}

#[tokio::test]
async fn test_cli_mkdir_and_rm_folder() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    let run = |args: &[&str]| {
        let mut argv = vec!["bucketdock", "--yes"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    };

    run(&["mkdir", "photos", "2024"]).dispatch(&t.app).await.unwrap();
    assert_eq!(t.store.current_keys("photos"), vec!["2024/".to_string()]);

    run(&["rm", "photos", "2024/"]).dispatch(&t.app).await.unwrap();
    assert!(t.store.current_keys("photos").is_empty());
}

#[tokio::test]
async fn test_versions_restore_brings_back_old_content() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("photos").await;
    upload(&t, "photos", "", &[UploadFile::new("a.txt", "v1")]).await;
    upload(&t, "photos", "", &[UploadFile::new("a.txt", "v2")]).await;

    let versions = t.app.versions().unwrap();
    let history = versions.history("photos", "a.txt").await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_latest);

    let err = versions
        .restore("photos", "a.txt", &history[0].version_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    versions
        .restore("photos", "a.txt", &history[1].version_id)
        .await
        .unwrap();
    let body = t
        .app
        .previews()
        .unwrap()
        .fetch("photos", "a.txt", None)
        .await
        .unwrap();
    assert_eq!(&body[..], b"v1");
}
