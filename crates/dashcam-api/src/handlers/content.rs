//! Binary video download responses.

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use dashcam_core::config::upload::UploadConfig;

const CONTENT_TRANSFER_ENCODING: HeaderName = HeaderName::from_static("content-transfer-encoding");

/// Raw content with the configured type and filename.
pub fn video_body(content: Vec<u8>, config: &UploadConfig) -> Response {
    let content_type = HeaderValue::from_str(&config.content_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    let disposition =
        HeaderValue::from_str(&format!("inline; filename=\"{}\"", config.download_filename))
            .unwrap_or(HeaderValue::from_static("inline"));
    let length = HeaderValue::from(content.len());

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type),
            (CONTENT_TRANSFER_ENCODING, HeaderValue::from_static("binary")),
            (CONTENT_DISPOSITION, disposition),
            (CONTENT_LENGTH, length),
        ],
        Body::from(content),
    )
        .into_response()
}
