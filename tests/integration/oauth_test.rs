//! Integration tests for the token endpoint and bearer authentication.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_password_grant_response_shape() {
    let app = TestApp::new();
    app.create_account("grant@example.com").await;

    let response = app
        .request(
            "POST",
            "/oauth/token",
            Some(json!({
                "grant_type": "password",
                "username": "grant@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.headers["cache-control"], "no-store");
    assert_eq!(response.body["token_type"], "Bearer");
    assert_eq!(response.body["scope"], "all");
    assert_eq!(response.body["expires_in"], 3600);
    assert_eq!(response.body["access_token"].as_str().unwrap().len(), 128);
}

#[tokio::test]
async fn test_form_encoded_grant() {
    let app = TestApp::new();
    app.create_account("form@example.com").await;

    let req = Request::builder()
        .method("POST")
        .uri("/oauth/token")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(
            "grant_type=password&username=form%40example.com&password=Str0ng%21pass",
        ))
        .unwrap();

    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert!(response.body["access_token"].is_string());
}

#[tokio::test]
async fn test_grant_errors() {
    let app = TestApp::new();
    app.create_account("known@example.com").await;

    let cases = [
        (json!({}), 1005),
        (json!({ "grant_type": "client_credentials" }), 1006),
        (json!({ "grant_type": "password", "username": "nobody@example.com", "password": PASSWORD }), 1008),
        (json!({ "grant_type": "password", "username": "known@example.com", "password": "Wr0ng!pass" }), 1010),
        (json!({ "grant_type": "refresh_token" }), 1011),
        (json!({ "grant_type": "refresh_token", "refresh_token": "deadbeef" }), 1012),
    ];

    for (body, code) in cases {
        let response = app.request("POST", "/oauth/token", Some(body.clone()), None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(response.field_codes().contains(&code), "{body}: {:?}", response.body);
    }
}

#[tokio::test]
async fn test_refresh_grant_issues_working_access_token() {
    let app = TestApp::new();
    app.create_account("refresh@example.com").await;
    let (_, refresh) = app.login("refresh@example.com").await;

    let response = app
        .request(
            "POST",
            "/oauth/token",
            Some(json!({ "grant_type": "refresh_token", "refresh_token": refresh })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["refresh_token"], refresh.as_str());
    let access = response.body["access_token"].as_str().unwrap();

    let me = app.request("GET", "/Account", None, Some(access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "refresh@example.com");
}

#[tokio::test]
async fn test_missing_authorization_challenges() {
    let app = TestApp::new();

    let response = app.request("GET", "/Account/Videos", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers["www-authenticate"], "Bearer");
    assert_eq!(response.body["code"], 1000);
}

#[tokio::test]
async fn test_malformed_authorization() {
    let app = TestApp::new();
    let req = Request::builder()
        .method("GET")
        .uri("/Account")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 1001);
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.request("GET", "/Account", None, Some("0123abcd")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers["www-authenticate"], "Bearer");
    assert_eq!(response.body["code"], 1002);
}

#[tokio::test]
async fn test_refresh_token_cannot_authenticate() {
    let app = TestApp::new();
    app.create_account("kind@example.com").await;
    let (_, refresh) = app.login("kind@example.com").await;

    let response = app.request("GET", "/Account", None, Some(&refresh)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_both_tokens() {
    let app = TestApp::new();
    app.create_account("bye@example.com").await;
    let (access, refresh) = app.login("bye@example.com").await;

    let response = app
        .request(
            "DELETE",
            "/oauth/token",
            Some(json!({ "refresh_token": refresh })),
            Some(&access),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let me = app.request("GET", "/Account", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let renewed = app
        .request(
            "POST",
            "/oauth/token",
            Some(json!({ "grant_type": "refresh_token", "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(renewed.status, StatusCode::BAD_REQUEST);
    assert_eq!(renewed.field_codes(), vec![1012]);
}

#[tokio::test]
async fn test_logout_with_unknown_refresh_token() {
    let app = TestApp::new();
    let access = app.signed_in("half@example.com").await;

    let response = app
        .request(
            "DELETE",
            "/oauth/token",
            Some(json!({ "refresh_token": "not-a-real-token" })),
            Some(&access),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 1003);

    // The access token was still revoked.
    let me = app.request("GET", "/Account", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_body() {
    let app = TestApp::new();
    let access = app.signed_in("plain@example.com").await;

    let req = Request::builder()
        .method("DELETE")
        .uri("/oauth/token")
        .header("Authorization", format!("Bearer {access}"))
        .body(Body::empty())
        .unwrap();

    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}
