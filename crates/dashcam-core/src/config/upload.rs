//! Upload and download configuration.

use serde::{Deserialize, Serialize};

/// Video upload and download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest single chunk accepted by the chunk endpoint.
    #[serde(default = "default_max_chunk")]
    pub max_chunk_bytes: usize,
    /// `Content-Type` of downloaded video bodies.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Filename advertised in `Content-Disposition`.
    #[serde(default = "default_filename")]
    pub download_filename: String,
    /// Chunks untouched for this long are considered abandoned by `purge`.
    #[serde(default = "default_stale_hours")]
    pub stale_chunk_hours: i64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: default_max_chunk(),
            content_type: default_content_type(),
            download_filename: default_filename(),
            stale_chunk_hours: default_stale_hours(),
        }
    }
}

fn default_max_chunk() -> usize {
    16 * 1024 * 1024
}

fn default_content_type() -> String {
    "video/quicktime".to_string()
}

fn default_filename() -> String {
    "dashcam_video.MOV".to_string()
}

fn default_stale_hours() -> i64 {
    48
}
