//! Video metadata entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dashcam_core::types::{AccountId, VideoId};

/// Upload progress of a video, derived from what the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    /// Metadata exists, no content and no chunks.
    Registered,
    /// One or more chunks stored, not yet merged.
    Assembling,
    /// Content populated.
    Committed,
}

impl UploadState {
    /// Derive the state. Pending chunks win over existing content because a
    /// new assembly replaces the content on its next finalize.
    pub fn derive(has_content: bool, pending_chunks: i64) -> Self {
        if pending_chunks > 0 {
            Self::Assembling
        } else if has_content {
            Self::Committed
        } else {
            Self::Registered
        }
    }
}

/// Video metadata row. Content bytes are never loaded into this struct.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    /// SHA-256 hex of the content, supplied by the client.
    pub id: VideoId,
    /// Owner; immutable after creation.
    pub account_id: AccountId,
    pub thumbnail: Option<Vec<u8>>,
    /// Recording start as reported by the camera.
    pub started: DateTime<Utc>,
    /// Declared content size in bytes.
    pub size: i64,
    /// Duration in seconds.
    pub length: i64,
    pub start_lat: Option<f64>,
    pub start_long: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_long: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub committed_at: Option<DateTime<Utc>>,
    /// Whether `content` is non-null.
    pub has_content: bool,
    /// Chunks waiting for finalize.
    pub pending_chunks: i64,
}

impl Video {
    /// Current upload state.
    pub fn state(&self) -> UploadState {
        UploadState::derive(self.has_content, self.pending_chunks)
    }
}

/// Data required to register a video.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub id: VideoId,
    pub account_id: AccountId,
    pub thumbnail: Option<Vec<u8>>,
    pub started: DateTime<Utc>,
    pub size: i64,
    pub length: i64,
    pub start_lat: Option<f64>,
    pub start_long: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_long: Option<f64>,
    /// Whole content supplied in one shot; commits the video on insert.
    pub content: Option<Vec<u8>>,
}
