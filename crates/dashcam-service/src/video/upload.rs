//! Chunked content upload, assembly and owner download.
//!
//! A client PUTs numbered chunks in any order, then PUTs `offset=-1` to
//! merge them by ascending part number into the committed content. Chunks
//! written after a commit start a fresh assembly that replaces it on the
//! next finalize.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Duration;
use tracing::{debug, info};

use dashcam_core::error::{AppError, ErrorCode, FieldErrors};
use dashcam_core::result::AppResult;
use dashcam_core::types::VideoId;
use dashcam_database::{ContentLookup, VideoStore};
use dashcam_entity::video::{ChunkReceipt, FinalizeOutcome};

use crate::context::RequestContext;

/// Parsed `offset` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    /// `-1`: merge pending chunks.
    Finalize,
    /// Non-negative chunk number.
    Part(i32),
}

impl Offset {
    /// Parse the raw query value.
    pub fn parse(raw: Option<&str>) -> Result<Self, ErrorCode> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(ErrorCode::MissingOffset);
        };
        match raw.parse::<i64>() {
            Ok(-1) => Ok(Self::Finalize),
            Ok(n) => i32::try_from(n)
                .ok()
                .filter(|n| *n >= 0)
                .map(Self::Part)
                .ok_or(ErrorCode::InvalidOffset),
            Err(_) => Err(ErrorCode::InvalidOffset),
        }
    }
}

/// Result of a content PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A chunk was stored (or overwritten).
    Stored(ChunkReceipt),
    /// Pending chunks were merged, or the content was already committed.
    Finalized {
        video_id: VideoId,
        parts: usize,
        size: usize,
        already_committed: bool,
    },
}

/// Accepts chunks, finalizes assemblies and serves owner downloads.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Video store.
    videos: Arc<dyn VideoStore>,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(videos: Arc<dyn VideoStore>) -> Self {
        Self { videos }
    }

    /// Store one chunk, or finalize when the offset is `-1`.
    ///
    /// Id and offset are validated together before the store is touched.
    pub async fn put_content(
        &self,
        ctx: &RequestContext,
        raw_id: &str,
        raw_offset: Option<&str>,
        body: Bytes,
    ) -> AppResult<UploadOutcome> {
        let mut errors = FieldErrors::new();

        let id = VideoId::parse(raw_id)
            .map_err(|_| errors.add(ErrorCode::InvalidVideoId, "id"))
            .ok();
        let offset = Offset::parse(raw_offset)
            .map_err(|code| errors.add(code, "offset"))
            .ok();
        errors.into_result()?;

        let (Some(id), Some(offset)) = (id, offset) else {
            return Err(AppError::internal("validated upload parameters missing"));
        };

        match offset {
            Offset::Part(part) => self.store_chunk(ctx, id, part, body).await,
            Offset::Finalize => self.finalize(ctx, id).await,
        }
    }

    async fn store_chunk(
        &self,
        ctx: &RequestContext,
        id: VideoId,
        part: i32,
        body: Bytes,
    ) -> AppResult<UploadOutcome> {
        let bytes = body.len();
        let stored = self
            .videos
            .put_chunk(&id, ctx.account_id, part, body.to_vec())
            .await?;
        if !stored {
            return Err(AppError::not_found(ErrorCode::VideoNotFound));
        }

        debug!(video_id = %id, part, bytes, "Chunk stored");
        Ok(UploadOutcome::Stored(ChunkReceipt {
            video_id: id,
            part,
            bytes,
        }))
    }

    async fn finalize(&self, ctx: &RequestContext, id: VideoId) -> AppResult<UploadOutcome> {
        let outcome = self
            .videos
            .finalize(&id, ctx.account_id)
            .await?
            .ok_or_else(|| AppError::not_found(ErrorCode::VideoNotFound))?;

        match outcome {
            FinalizeOutcome::Committed { parts, size } => {
                info!(video_id = %id, parts, size, "Video content committed");
                Ok(UploadOutcome::Finalized {
                    video_id: id,
                    parts,
                    size,
                    already_committed: false,
                })
            }
            FinalizeOutcome::AlreadyCommitted { size } => Ok(UploadOutcome::Finalized {
                video_id: id,
                parts: 0,
                size,
                already_committed: true,
            }),
            FinalizeOutcome::NothingToFinalize => Err(AppError::invalid_field(
                ErrorCode::NothingToFinalize,
                "offset",
            )),
        }
    }

    /// Committed content of one of the caller's videos.
    pub async fn get_content(&self, ctx: &RequestContext, raw_id: &str) -> AppResult<Vec<u8>> {
        let id = VideoId::parse(raw_id)
            .map_err(|_| AppError::not_found(ErrorCode::VideoNotFound))?;

        match self.videos.content_owned(&id, ctx.account_id).await? {
            ContentLookup::Ready(content) => Ok(content),
            ContentLookup::Pending => Err(AppError::not_found(
                ErrorCode::VideoContentNotAvailable,
            )),
            ContentLookup::NotFound => Err(AppError::not_found(ErrorCode::VideoNotFound)),
        }
    }

    /// Drop chunks abandoned for longer than `hours`.
    pub async fn purge_stale_chunks(&self, hours: i64) -> AppResult<u64> {
        let older_than = Duration::try_hours(hours)
            .filter(|age| *age >= Duration::zero())
            .ok_or_else(|| {
                AppError::configuration(format!("Chunk age threshold out of range: {hours} hours"))
            })?;
        let purged = self.videos.purge_stale_chunks(older_than).await?;
        info!(purged, hours, "Stale chunks purged");
        Ok(purged)
    }
}
