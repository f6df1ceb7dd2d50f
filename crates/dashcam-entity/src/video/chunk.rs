//! Chunked upload results.

use serde::{Deserialize, Serialize};

use dashcam_core::types::VideoId;

/// Acknowledgement of a stored chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkReceipt {
    pub video_id: VideoId,
    pub part: i32,
    pub bytes: usize,
}

/// Result of a finalize request on an owned video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Chunks were merged in ascending part order and deleted.
    Committed { parts: usize, size: usize },
    /// No chunks were pending but content already exists; nothing changed.
    AlreadyCommitted { size: usize },
    /// No chunks and no content.
    NothingToFinalize,
}

/// Concatenate chunk payloads in ascending part order.
///
/// Input order is irrelevant; only the part number decides placement.
pub fn assemble(mut parts: Vec<(i32, Vec<u8>)>) -> Vec<u8> {
    parts.sort_by_key(|(part, _)| *part);
    let total = parts.iter().map(|(_, bytes)| bytes.len()).sum();
    let mut content = Vec::with_capacity(total);
    for (_, bytes) in parts {
        content.extend_from_slice(&bytes);
    }
    content
}
