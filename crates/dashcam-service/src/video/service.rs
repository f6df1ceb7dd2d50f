//! Video metadata service.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use dashcam_core::error::{AppError, ErrorCode, FieldError, FieldErrors};
use dashcam_core::result::AppResult;
use dashcam_core::types::VideoId;
use dashcam_database::VideoStore;
use dashcam_entity::video::{NewVideo, Video};

use crate::context::RequestContext;

/// Metadata supplied when registering a recording.
///
/// Values stay untyped so every malformed field is reported at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVideoRequest {
    pub thumbnail: Option<Value>,
    pub started: Option<Value>,
    pub size: Option<Value>,
    pub length: Option<Value>,
    pub start_lat: Option<Value>,
    pub start_long: Option<Value>,
    pub end_lat: Option<Value>,
    pub end_long: Option<Value>,
    /// Whole recording, base64. Commits the content in the same step.
    pub video_content: Option<Value>,
}

/// Registers and lists videos.
#[derive(Debug, Clone)]
pub struct VideoService {
    /// Video store.
    videos: Arc<dyn VideoStore>,
}

impl VideoService {
    /// Creates a new video service.
    pub fn new(videos: Arc<dyn VideoStore>) -> Self {
        Self { videos }
    }

    /// Register a video under the caller's account.
    pub async fn register(
        &self,
        ctx: &RequestContext,
        raw_id: &str,
        req: RegisterVideoRequest,
    ) -> AppResult<Video> {
        let mut errors = FieldErrors::new();

        let id = match VideoId::parse(raw_id) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(ErrorCode::InvalidVideoId, "id");
                None
            }
        };
        let started = timestamp(&mut errors, "started", req.started.as_ref());
        let size = count(&mut errors, "size", req.size.as_ref());
        let length = count(&mut errors, "length", req.length.as_ref());
        let thumbnail = binary(&mut errors, "thumbnail", req.thumbnail.as_ref());
        let content = binary(&mut errors, "videoContent", req.video_content.as_ref());
        let start_lat = coordinate(&mut errors, "startLat", req.start_lat.as_ref(), 90.0);
        let start_long = coordinate(&mut errors, "startLong", req.start_long.as_ref(), 180.0);
        let end_lat = coordinate(&mut errors, "endLat", req.end_lat.as_ref(), 90.0);
        let end_long = coordinate(&mut errors, "endLong", req.end_long.as_ref(), 180.0);

        if let (Some(Some(content)), Some(size)) = (&content, size) {
            if content.len() as i64 != size {
                errors.push(FieldError::with_message(
                    ErrorCode::InvalidVideoMetadata,
                    "size",
                    "size must equal the length of videoContent",
                ));
            }
        }
        errors.into_result()?;

        let (Some(id), Some(started), Some(size), Some(length)) = (id, started, size, length)
        else {
            return Err(AppError::internal("validated video fields missing"));
        };

        let video = self
            .videos
            .create(NewVideo {
                id,
                account_id: ctx.account_id,
                thumbnail: thumbnail.flatten(),
                started,
                size,
                length,
                start_lat: start_lat.flatten(),
                start_long: start_long.flatten(),
                end_lat: end_lat.flatten(),
                end_long: end_long.flatten(),
                content: content.flatten(),
            })
            .await?;

        info!(
            video_id = %video.id,
            account_id = %ctx.account_id,
            committed = video.has_content,
            "Video registered"
        );
        Ok(video)
    }

    /// Every video of the caller, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Video>> {
        self.videos.list_by_account(ctx.account_id).await
    }
}

fn invalid(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.push(FieldError::with_message(
        ErrorCode::InvalidVideoMetadata,
        field,
        message,
    ));
}

/// Required RFC 3339 timestamp.
fn timestamp(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value {
        None | Some(Value::Null) => {
            invalid(errors, field, format!("Must provide {field}"));
            None
        }
        Some(Value::String(text)) => match DateTime::parse_from_rfc3339(text) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                invalid(errors, field, format!("{field} must be an RFC 3339 timestamp"));
                None
            }
        },
        Some(_) => {
            errors.add(ErrorCode::NotAString, field);
            None
        }
    }
}

/// Required non-negative integer.
fn count(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<i64> {
    match value {
        None | Some(Value::Null) => {
            invalid(errors, field, format!("Must provide {field}"));
            None
        }
        Some(value) => match value.as_i64() {
            Some(n) if n >= 0 => Some(n),
            _ => {
                invalid(errors, field, format!("{field} must be a non-negative integer"));
                None
            }
        },
    }
}

/// Optional base64 payload. The outer `None` marks a recorded failure.
fn binary(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<Option<Vec<u8>>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(text)) => match STANDARD.decode(text) {
            Ok(bytes) => Some(Some(bytes)),
            Err(_) => {
                invalid(errors, field, format!("{field} must be base64 encoded"));
                None
            }
        },
        Some(_) => {
            errors.add(ErrorCode::NotAString, field);
            None
        }
    }
}

/// Optional coordinate within `[-limit, limit]` degrees.
fn coordinate(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
    limit: f64,
) -> Option<Option<f64>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(value) => match value.as_f64() {
            Some(deg) if deg.is_finite() && deg.abs() <= limit => Some(Some(deg)),
            _ => {
                invalid(errors, field, format!("{field} must be a number between -{limit} and {limit}"));
                None
            }
        },
    }
}
