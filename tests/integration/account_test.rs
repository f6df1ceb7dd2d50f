//! Integration tests for account registration and self-service.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_create_account_returns_location() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/Accounts",
            Some(json!({
                "email": "driver@example.com",
                "fullName": "Ada Driver",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_str().unwrap();
    assert_eq!(response.headers["location"], format!("/Accounts/{id}").as_str());
    assert_eq!(response.body["fullName"], "Ada Driver");
    assert!(response.body.get("password").is_none());
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_account_reports_all_errors() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/Accounts",
            Some(json!({ "email": "bad", "fullName": "   ", "password": "short" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 1024);
    let codes = response.field_codes();
    assert_eq!(codes.len(), 3);
    for code in [1015, 1017, 1019] {
        assert!(codes.contains(&code), "missing {code} in {codes:?}");
    }
}

#[tokio::test]
async fn test_duplicate_email_is_constraint_violation() {
    let app = TestApp::new();
    let first = app.create_account("dup@example.com").await;

    let response = app
        .request(
            "POST",
            "/Accounts",
            Some(json!({
                "email": "DUP@example.com",
                "fullName": "Someone Else",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 1025);
    assert_eq!(response.field_codes(), vec![1013]);

    let token = app.login("dup@example.com").await.0;
    let me = app.request("GET", "/Account", None, Some(&token)).await;
    assert_eq!(me.body["id"], first.as_str());
    assert_eq!(me.body["fullName"], "Test Driver");
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let app = TestApp::new();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/Accounts")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 1026);
}

#[tokio::test]
async fn test_patch_own_account() {
    let app = TestApp::new();
    let id = app.create_account("me@example.com").await;
    let token = app.login("me@example.com").await.0;

    let response = app
        .request(
            "PATCH",
            &format!("/Accounts/{id}"),
            Some(json!({ "fullName": "Renamed" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["fullName"], "Renamed");
    assert_eq!(response.body["email"], "me@example.com");
}

#[tokio::test]
async fn test_patch_password_changes_login() {
    let app = TestApp::new();
    let id = app.create_account("pw@example.com").await;
    let token = app.login("pw@example.com").await.0;

    let response = app
        .request(
            "PATCH",
            &format!("/Accounts/{id}"),
            Some(json!({ "password": "N3w!Secret" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let old = app
        .request(
            "POST",
            "/oauth/token",
            Some(json!({ "grant_type": "password", "username": "pw@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(old.status, StatusCode::BAD_REQUEST);
    assert_eq!(old.field_codes(), vec![1010]);

    let new = app
        .request(
            "POST",
            "/oauth/token",
            Some(json!({ "grant_type": "password", "username": "pw@example.com", "password": "N3w!Secret" })),
            None,
        )
        .await;
    assert_eq!(new.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_patch_rejects_unknown_field() {
    let app = TestApp::new();
    let id = app.create_account("field@example.com").await;
    let token = app.login("field@example.com").await.0;

    let response = app
        .request(
            "PATCH",
            &format!("/Accounts/{id}"),
            Some(json!({ "fullName": "Fine", "created": "2020-01-01" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.field_codes(), vec![1035]);
    assert_eq!(response.body["errors"][0]["field"], "created");

    let me = app.request("GET", "/Account", None, Some(&token)).await;
    assert_eq!(me.body["fullName"], "Test Driver");
}

#[tokio::test]
async fn test_patch_other_account_is_not_found() {
    let app = TestApp::new();
    let victim = app.create_account("victim@example.com").await;
    let token = app.signed_in("attacker@example.com").await;

    let response = app
        .request(
            "PATCH",
            &format!("/Accounts/{victim}"),
            Some(json!({ "fullName": "Owned" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], 1030);
}
