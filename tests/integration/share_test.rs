//! Integration tests for share links.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{HELLO_ID, TestApp};

async fn committed_video(app: &TestApp, token: &str) {
    app.register_video(HELLO_ID, token).await;
    let path = format!("/Account/Videos/{HELLO_ID}/content");
    app.put_bytes(&format!("{path}?offset=0"), b"AB", token).await;
    app.put_bytes(&format!("{path}?offset=1"), b"CD", token).await;
    let finalized = app.put_bytes(&format!("{path}?offset=-1"), b"", token).await;
    assert_eq!(finalized.status, StatusCode::OK);
}

#[tokio::test]
async fn test_shared_video_downloads_without_auth() {
    let app = TestApp::new();
    let token = app.signed_in("sharer@example.com").await;
    committed_video(&app, &token).await;

    let created = app
        .request("POST", "/Share", Some(json!({ "id": HELLO_ID })), Some(&token))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let share_id = created.body["shareID"].as_str().unwrap().to_string();

    let downloaded = app
        .request("GET", &format!("/Share/{share_id}"), None, None)
        .await;
    assert_eq!(downloaded.status, StatusCode::OK);
    assert_eq!(downloaded.bytes, b"ABCD");
    assert_eq!(downloaded.headers["content-transfer-encoding"], "binary");
}

#[tokio::test]
async fn test_each_share_gets_a_new_link() {
    let app = TestApp::new();
    let token = app.signed_in("twice@example.com").await;
    committed_video(&app, &token).await;

    let body = Some(json!({ "id": HELLO_ID }));
    let first = app.request("POST", "/Share", body.clone(), Some(&token)).await;
    let second = app.request("POST", "/Share", body, Some(&token)).await;

    assert_ne!(first.body["shareID"], second.body["shareID"]);
}

#[tokio::test]
async fn test_cannot_share_someone_elses_video() {
    let app = TestApp::new();
    let owner = app.signed_in("owner@example.com").await;
    let other = app.signed_in("other@example.com").await;
    committed_video(&app, &owner).await;

    let response = app
        .request("POST", "/Share", Some(json!({ "id": HELLO_ID })), Some(&other))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], 1054);
}

#[tokio::test]
async fn test_share_requires_valid_id() {
    let app = TestApp::new();
    let token = app.signed_in("invalid@example.com").await;

    let missing = app.request("POST", "/Share", Some(json!({})), Some(&token)).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.field_codes(), vec![1050]);

    let anonymous = app
        .request("POST", "/Share", Some(json!({ "id": HELLO_ID })), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_share_link() {
    let app = TestApp::new();

    for token in ["AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", "not-a-share"] {
        let response = app
            .request("GET", &format!("/Share/{token}"), None, None)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{token}");
        assert_eq!(response.body["code"], 1054);
    }
}
