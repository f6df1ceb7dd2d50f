//! Response DTOs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dashcam_entity::account::Account;
use dashcam_entity::video::{ChunkReceipt, UploadState, Video};

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub created: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id.to_string(),
            email: a.email,
            full_name: a.full_name,
            created: a.created_at,
        }
    }
}

/// Video metadata. Content bytes are never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub started: DateTime<Utc>,
    pub size: i64,
    pub length: i64,
    pub start_lat: Option<f64>,
    pub start_long: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_long: Option<f64>,
    pub created: DateTime<Utc>,
    pub committed: Option<DateTime<Utc>>,
    pub state: UploadState,
}

impl From<Video> for VideoResponse {
    fn from(v: Video) -> Self {
        let state = v.state();
        Self {
            id: v.id.to_string(),
            thumbnail: v.thumbnail.map(|t| STANDARD.encode(t)),
            started: v.started,
            size: v.size,
            length: v.length,
            start_lat: v.start_lat,
            start_long: v.start_long,
            end_lat: v.end_lat,
            end_long: v.end_long,
            created: v.created_at,
            committed: v.committed_at,
            state,
        }
    }
}

/// A stored chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkAcceptedResponse {
    pub id: String,
    pub part: i32,
    pub bytes: usize,
}

impl From<ChunkReceipt> for ChunkAcceptedResponse {
    fn from(r: ChunkReceipt) -> Self {
        Self {
            id: r.video_id.to_string(),
            part: r.part,
            bytes: r.bytes,
        }
    }
}

/// Result of a finalize call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeResponse {
    pub id: String,
    /// Chunks merged by this call; zero when already committed.
    pub parts: usize,
    pub size: usize,
    pub state: UploadState,
}

/// A freshly minted share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    #[serde(rename = "shareID")]
    pub share_id: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}
