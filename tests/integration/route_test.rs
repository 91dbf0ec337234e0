//! Integration tests for route guarding.

use clap::Parser;

use bucketdock_auth::{GuardDecision, Route, RouteGuard};
use bucketdock_cli::Cli;
use bucketdock_core::ErrorKind;
use bucketdock_entity::bucket::PublicLevel;
use bucketdock_service::UploadFile;

use crate::helpers::{ADMIN, OWNER, TestApp};

fn open(route: &str) -> Cli {
    Cli::try_parse_from(["bucketdock", "open", route]).unwrap()
}

fn decide(t: &TestApp, route: &str, level: Option<PublicLevel>) -> GuardDecision {
    RouteGuard::evaluate(
        &Route::parse(route),
        &t.app.auth().sessions().state(),
        &t.app.auth().profiles().state(),
        level,
    )
}

#[tokio::test]
async fn test_anonymous_viewer_of_read_write_bucket_can_list_and_upload() {
    let t = TestApp::signed_in(OWNER).await;
    let bucket = t.create_bucket("dropbox").await;
    t.set_level(&bucket, PublicLevel::ReadWrite).await;
    t.put("dropbox", "hello.txt", 5).await;
    t.logout().await;

    assert_eq!(
        decide(&t, "/bucket/dropbox/", Some(PublicLevel::ReadWrite)),
        GuardDecision::Render
    );
    open("/bucket/dropbox/").dispatch(&t.app).await.unwrap();

    let (_, access) = t.app.open_bucket("dropbox").await.unwrap();
    assert!(access.can_write);
    assert!(!access.can_manage);

    let report = t
        .app
        .uploads()
        .unwrap()
        .upload(
            &t.app.ctx(),
            "dropbox",
            "",
            &[UploadFile::new("from-anon.txt", "hi")],
        )
        .await
        .unwrap();
    assert_eq!(report.keys, vec!["from-anon.txt".to_string()]);
    assert!(t.backend.calls_named("adjust_space_used").is_empty());
}

#[tokio::test]
async fn test_anonymous_viewer_of_private_bucket_is_sent_to_login() {
    let t = TestApp::signed_in(OWNER).await;
    t.create_bucket("secret").await;
    t.logout().await;

    assert_eq!(
        decide(&t, "/bucket/secret/", None),
        GuardDecision::Redirect("/login".into())
    );
    open("/bucket/secret/").dispatch(&t.app).await.unwrap();
    assert!(t.store.operations().iter().all(|op| !matches!(
        op,
        bucketdock_storage::providers::StoreOp::ListObjects { .. }
    )));
}

#[tokio::test]
async fn test_admin_route_redirects_non_admins_home() {
    let t = TestApp::signed_in(OWNER).await;

    assert_eq!(decide(&t, "/admin", None), GuardDecision::Redirect("/".into()));
    open("/admin").dispatch(&t.app).await.unwrap();
    assert!(t.backend.calls_named("get-all-users").is_empty());
}

#[tokio::test]
async fn test_admin_route_renders_for_admins() {
    let t = TestApp::signed_in(ADMIN).await;

    assert_eq!(decide(&t, "/admin", None), GuardDecision::Render);
    open("/admin").dispatch(&t.app).await.unwrap();
    assert!(!t.backend.calls_named("get-all-users").is_empty());
}

#[tokio::test]
async fn test_signed_out_home_redirects_to_login() {
    let t = TestApp::new().await;
    assert_eq!(decide(&t, "/", None), GuardDecision::Redirect("/login".into()));
    assert_eq!(decide(&t, "/login", None), GuardDecision::Render);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let t = TestApp::signed_in(OWNER).await;
    let err = open("/settings").dispatch(&t.app).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
