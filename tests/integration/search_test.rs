//! Integration tests for bucket and object search.

use bucketdock_core::AppError;
use bucketdock_storage::providers::StoreOperation;

use crate::helpers::{OWNER, TestApp};

fn keys(results: &bucketdock_service::SearchResults) -> Vec<&str> {
    results.objects.iter().map(|h| h.key.as_str()).collect()
}

#[tokio::test]
async fn test_search_skips_folder_placeholders_and_exact_query_key() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("docs").await;
    t.put("docs", "reports/", 0).await;
    t.put("docs", "reports", 2).await;
    t.put("docs", "reports/q1.txt", 3).await;
    t.put("docs", "reports/2024/", 0).await;

    let results = t
        .app
        .search()
        .unwrap()
        .search(&t.app.ctx(), "reports")
        .await
        .unwrap();

    assert_eq!(keys(&results), vec!["reports/q1.txt"]);
    assert_eq!(results.objects[0].bucket, "docs");
    assert_eq!(results.objects[0].folder, "reports/");
    assert_eq!(results.objects[0].size, 3);
}

#[tokio::test]
async fn test_search_matches_bucket_names_ignoring_case() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("holiday-photos").await;
    t.create_bucket("invoices").await;

    let results = t
        .app
        .search()
        .unwrap()
        .search(&t.app.ctx(), "PHOTO")
        .await
        .unwrap();

    let names: Vec<&str> = results.buckets.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["holiday-photos"]);
    assert!(results.objects.is_empty());
}

#[tokio::test]
async fn test_search_matches_object_keys_by_prefix_only() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("docs").await;
    t.put("docs", "2024/report.txt", 4).await;
    t.put("docs", "report-final.txt", 4).await;

    let search = t.app.search().unwrap();
    let inside = search.search(&t.app.ctx(), "report").await.unwrap();
    assert_eq!(keys(&inside), vec!["report-final.txt"]);
    assert_eq!(inside.objects[0].folder, "");

    let nested = search.search(&t.app.ctx(), "2024/rep").await.unwrap();
    assert_eq!(keys(&nested), vec!["2024/report.txt"]);

    let middle = search.search(&t.app.ctx(), "final").await.unwrap();
    assert!(middle.is_empty());
}

#[tokio::test]
async fn test_search_reports_bucket_whose_listing_fails() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("alpha").await;
    t.create_bucket("beta").await;
    t.put("alpha", "notes.txt", 1).await;
    t.put("beta", "notes.txt", 1).await;
    t.store.inject_key_failure(
        StoreOperation::ListObjects,
        "beta",
        AppError::storage("access denied"),
    );

    let results = t
        .app
        .search()
        .unwrap()
        .search(&t.app.ctx(), "notes")
        .await
        .unwrap();

    assert_eq!(keys(&results), vec!["notes.txt"]);
    assert_eq!(results.objects[0].bucket, "alpha");
    assert_eq!(results.skipped, vec!["beta".to_string()]);
}

#[tokio::test]
async fn test_search_empty_query_returns_nothing() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("docs").await;
    t.put("docs", "notes.txt", 1).await;

    let results = t
        .app
        .search()
        .unwrap()
        .search(&t.app.ctx(), "   ")
        .await
        .unwrap();

    assert!(results.is_empty());
    assert!(results.skipped.is_empty());
    assert_eq!(results.query, "");
}

#[tokio::test]
async fn test_search_signed_out_returns_nothing() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("docs").await;
    t.put("docs", "docs-index.txt", 1).await;
    t.logout().await;

    let results = t
        .app
        .search()
        .unwrap()
        .search(&t.app.ctx(), "docs")
        .await
        .unwrap();

    assert!(results.is_empty());
}
