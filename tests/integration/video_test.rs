//! Integration tests for video metadata, chunked upload and download.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{HELLO_ID, TestApp};

fn content_path(id: &str, offset: Option<&str>) -> String {
    match offset {
        Some(offset) => format!("/Account/Videos/{id}/content?offset={offset}"),
        None => format!("/Account/Videos/{id}/content"),
    }
}

#[tokio::test]
async fn test_chunked_upload_round_trip() {
    let app = TestApp::new();
    let token = app.signed_in("camera@example.com").await;

    let registered = app.register_video(HELLO_ID, &token).await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(
        registered.headers["location"],
        format!("/Account/Videos/{HELLO_ID}").as_str()
    );
    assert_eq!(registered.body["state"], "registered");

    let second = app
        .put_bytes(&content_path(HELLO_ID, Some("1")), b"CD", &token)
        .await;
    assert_eq!(second.status, StatusCode::ACCEPTED);
    assert_eq!(second.body["part"], 1);
    assert_eq!(second.body["bytes"], 2);

    let first = app
        .put_bytes(&content_path(HELLO_ID, Some("0")), b"AB", &token)
        .await;
    assert_eq!(first.status, StatusCode::ACCEPTED);

    let finalized = app
        .put_bytes(&content_path(HELLO_ID, Some("-1")), b"", &token)
        .await;
    assert_eq!(finalized.status, StatusCode::OK);
    assert_eq!(finalized.body["parts"], 2);
    assert_eq!(finalized.body["size"], 4);
    assert_eq!(finalized.body["state"], "committed");

    let downloaded = app
        .request("GET", &content_path(HELLO_ID, None), None, Some(&token))
        .await;
    assert_eq!(downloaded.status, StatusCode::OK);
    assert_eq!(downloaded.bytes, b"ABCD");
    assert_eq!(
        downloaded.headers["content-type"],
        app.config.upload.content_type.as_str()
    );
    assert_eq!(downloaded.headers["content-transfer-encoding"], "binary");
    assert_eq!(downloaded.headers["content-length"], "4");
    assert_eq!(
        downloaded.headers["content-disposition"],
        format!("inline; filename=\"{}\"", app.config.upload.download_filename).as_str()
    );
}

#[tokio::test]
async fn test_finalize_twice_is_idempotent() {
    let app = TestApp::new();
    let token = app.signed_in("twice@example.com").await;
    app.register_video(HELLO_ID, &token).await;
    app.put_bytes(&content_path(HELLO_ID, Some("0")), b"ABCD", &token)
        .await;

    let first = app
        .put_bytes(&content_path(HELLO_ID, Some("-1")), b"", &token)
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let again = app
        .put_bytes(&content_path(HELLO_ID, Some("-1")), b"", &token)
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["parts"], 0);
    assert_eq!(again.body["state"], "committed");
}

#[tokio::test]
async fn test_finalize_without_chunks() {
    let app = TestApp::new();
    let token = app.signed_in("empty@example.com").await;
    app.register_video(HELLO_ID, &token).await;

    let response = app
        .put_bytes(&content_path(HELLO_ID, Some("-1")), b"", &token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.field_codes(), vec![1057]);
}

#[tokio::test]
async fn test_offset_is_required() {
    let app = TestApp::new();
    let token = app.signed_in("offset@example.com").await;
    app.register_video(HELLO_ID, &token).await;

    let missing = app
        .put_bytes(&content_path(HELLO_ID, None), b"AB", &token)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.field_codes(), vec![1051]);

    for bad in ["-2", "abc", "1.5"] {
        let response = app
            .put_bytes(&content_path(HELLO_ID, Some(bad)), b"AB", &token)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "offset {bad}");
        assert_eq!(response.field_codes(), vec![1052], "offset {bad}");
    }

    let listed = app.request("GET", "/Account/Videos", None, Some(&token)).await;
    assert_eq!(listed.body[0]["id"], HELLO_ID);
    assert_eq!(listed.body[0]["state"], "registered");

    let finalized = app
        .put_bytes(&content_path(HELLO_ID, Some("-1")), b"", &token)
        .await;
    assert_eq!(finalized.status, StatusCode::BAD_REQUEST);
    assert_eq!(finalized.field_codes(), vec![1057]);
}

#[tokio::test]
async fn test_repeated_offset_is_an_envelope_error() {
    let app = TestApp::new();
    let token = app.signed_in("repeat@example.com").await;
    app.register_video(HELLO_ID, &token).await;

    let response = app
        .put_bytes(
            &format!("/Account/Videos/{HELLO_ID}/content?offset=0&offset=1"),
            b"AB",
            &token,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 1027);
    assert!(
        response.body["description"]
            .as_str()
            .is_some_and(|text| text.contains("offset")),
        "{:?}",
        response.body
    );

    let listed = app.request("GET", "/Account/Videos", None, Some(&token)).await;
    assert_eq!(listed.body[0]["state"], "registered");
}

#[tokio::test]
async fn test_chunked_and_whole_uploads_store_identical_bytes() {
    let app = TestApp::new();
    let token = app.signed_in("same@example.com").await;
    let whole_id = "b".repeat(64);

    app.register_video(HELLO_ID, &token).await;
    for (offset, chunk) in [("2", &b"D"[..]), ("0", &b"AB"[..]), ("1", &b"C"[..])] {
        let response = app
            .put_bytes(&content_path(HELLO_ID, Some(offset)), chunk, &token)
            .await;
        assert_eq!(response.status, StatusCode::ACCEPTED, "offset {offset}");
    }
    let finalized = app
        .put_bytes(&content_path(HELLO_ID, Some("-1")), b"", &token)
        .await;
    assert_eq!(finalized.body["parts"], 3);
    assert_eq!(finalized.body["size"], 4);

    let whole = app
        .request(
            "PUT",
            &format!("/Account/Videos/{whole_id}"),
            Some(json!({
                "started": "2024-05-01T08:30:00Z",
                "size": 4,
                "length": 30,
                "videoContent": "QUJDRA==",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(whole.status, StatusCode::CREATED, "{:?}", whole.body);
    assert_eq!(whole.body["state"], "committed");

    let chunked = app
        .request("GET", &content_path(HELLO_ID, None), None, Some(&token))
        .await;
    let single = app
        .request("GET", &content_path(&whole_id, None), None, Some(&token))
        .await;
    assert_eq!(chunked.status, StatusCode::OK);
    assert_eq!(single.status, StatusCode::OK);
    assert_eq!(chunked.bytes, b"ABCD");
    assert_eq!(chunked.bytes, single.bytes);
}

#[tokio::test]
async fn test_malformed_id_and_offset_reported_together() {
    let app = TestApp::new();
    let token = app.signed_in("both@example.com").await;

    let response = app
        .put_bytes(&content_path("not-a-hash", None), b"AB", &token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.field_codes(), vec![1050, 1051]);
}

#[tokio::test]
async fn test_chunk_for_unregistered_video() {
    let app = TestApp::new();
    let token = app.signed_in("ghost@example.com").await;

    let response = app
        .put_bytes(&content_path(HELLO_ID, Some("0")), b"AB", &token)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], 1054);
}

#[tokio::test]
async fn test_register_rejects_duplicate_and_bad_metadata() {
    let app = TestApp::new();
    let token = app.signed_in("meta@example.com").await;
    app.register_video(HELLO_ID, &token).await;

    let duplicate = app.register_video(HELLO_ID, &token).await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.field_codes(), vec![1053]);

    let bad = app
        .request(
            "PUT",
            &format!("/Account/Videos/{}", "a".repeat(64)),
            Some(json!({ "started": "yesterday", "size": -1, "length": 30, "startLat": 91.0 })),
            Some(&token),
        )
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.field_codes().len(), 3, "{:?}", bad.body);
}

#[tokio::test]
async fn test_videos_are_private_to_their_owner() {
    let app = TestApp::new();
    let owner = app.signed_in("owner@example.com").await;
    let other = app.signed_in("other@example.com").await;

    app.register_video(HELLO_ID, &owner).await;
    app.put_bytes(&content_path(HELLO_ID, Some("0")), b"ABCD", &owner)
        .await;
    app.put_bytes(&content_path(HELLO_ID, Some("-1")), b"", &owner)
        .await;

    let foreign = app
        .request("GET", &content_path(HELLO_ID, None), None, Some(&other))
        .await;
    assert_eq!(foreign.status, StatusCode::NOT_FOUND);
    assert_eq!(foreign.body["code"], 1054);

    let listed = app.request("GET", "/Account/Videos", None, Some(&other)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([]));

    let mine = app.request("GET", "/Account/Videos", None, Some(&owner)).await;
    assert_eq!(mine.body[0]["id"], HELLO_ID);
    assert_eq!(mine.body[0]["state"], "committed");
    assert!(mine.body[0].get("videoContent").is_none());
}

#[tokio::test]
async fn test_download_before_commit() {
    let app = TestApp::new();
    let token = app.signed_in("early@example.com").await;
    app.register_video(HELLO_ID, &token).await;

    let response = app
        .request("GET", &content_path(HELLO_ID, None), None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], 1055);
}
