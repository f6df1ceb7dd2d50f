//! Video repository implementation, including the chunk table.
//!
//! Chunk writes lock the parent video row `FOR SHARE`; finalize locks it
//! `FOR UPDATE`. Concurrent chunk writes therefore proceed in parallel, but
//! a finalize waits for in-flight writes and blocks new ones until its merge
//! has committed, and two finalize calls for one video run one after the
//! other.

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use tracing::debug;

use dashcam_core::error::{AppError, ErrorCode, ErrorKind};
use dashcam_core::result::AppResult;
use dashcam_core::types::{AccountId, VideoId};
use dashcam_entity::video::chunk::assemble;
use dashcam_entity::video::{FinalizeOutcome, NewVideo, Video};

use crate::store::{ContentLookup, VideoStore};

/// Primary key of `videos`.
const VIDEO_KEY: &str = "videos_pkey";

/// Metadata columns plus the derived upload state, for a `videos v` alias.
const VIDEO_COLUMNS: &str = "v.id, v.account_id, v.thumbnail, v.started, v.size, v.length, \
     v.start_lat, v.start_long, v.end_lat, v.end_long, v.created_at, v.committed_at, \
     (v.content IS NOT NULL) AS has_content, \
     (SELECT COUNT(*) FROM video_chunks c WHERE c.video_id = v.id) AS pending_chunks";

/// Repository for videos and their pending chunks.
#[derive(Debug, Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    /// Create a new video repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn create(&self, video: NewVideo) -> AppResult<Video> {
        let sql = format!(
            "INSERT INTO videos AS v \
                (id, account_id, thumbnail, started, size, length, \
                 start_lat, start_long, end_lat, end_long, content, committed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
                 CASE WHEN $11::BYTEA IS NULL THEN NULL ELSE NOW() END) \
             RETURNING {VIDEO_COLUMNS}"
        );

        sqlx::query_as::<_, Video>(&sql)
            .bind(&video.id)
            .bind(video.account_id)
            .bind(video.thumbnail.as_deref())
            .bind(video.started)
            .bind(video.size)
            .bind(video.length)
            .bind(video.start_lat)
            .bind(video.start_long)
            .bind(video.end_lat)
            .bind(video.end_long)
            .bind(video.content.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(VIDEO_KEY) => {
                    AppError::constraint(ErrorCode::VideoAlreadyRegistered, "id")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to create video", e),
            })
    }

    async fn list_by_account(&self, account_id: AccountId) -> AppResult<Vec<Video>> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos v \
             WHERE v.account_id = $1 ORDER BY v.created_at DESC, v.id"
        );

        sqlx::query_as::<_, Video>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list videos"))
    }

    async fn find_owned(&self, id: &VideoId, account_id: AccountId) -> AppResult<Option<Video>> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id = $1 AND v.account_id = $2"
        );

        sqlx::query_as::<_, Video>(&sql)
            .bind(id)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find video"))
    }

    async fn content_owned(
        &self,
        id: &VideoId,
        account_id: AccountId,
    ) -> AppResult<ContentLookup> {
        let row: Option<(Option<Vec<u8>>,)> =
            sqlx::query_as("SELECT content FROM videos WHERE id = $1 AND account_id = $2")
                .bind(id)
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to load video content"))?;

        Ok(match row {
            None => ContentLookup::NotFound,
            Some((None,)) => ContentLookup::Pending,
            Some((Some(bytes),)) => ContentLookup::Ready(bytes),
        })
    }

    async fn put_chunk(
        &self,
        id: &VideoId,
        account_id: AccountId,
        part: i32,
        bytes: Vec<u8>,
    ) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin chunk transaction"))?;

        let owned: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM videos WHERE id = $1 AND account_id = $2 FOR SHARE",
        )
        .bind(id)
        .bind(account_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock video for chunk write"))?;

        if owned.is_none() {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO video_chunks (video_id, part, content) VALUES ($1, $2, $3) \
             ON CONFLICT (video_id, part) \
             DO UPDATE SET content = EXCLUDED.content, uploaded_at = NOW()",
        )
        .bind(id)
        .bind(part)
        .bind(bytes)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to store chunk"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit chunk"))?;

        Ok(true)
    }

    async fn finalize(
        &self,
        id: &VideoId,
        account_id: AccountId,
    ) -> AppResult<Option<FinalizeOutcome>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin finalize transaction"))?;

        let locked: Option<(Option<i64>,)> = sqlx::query_as(
            "SELECT octet_length(content)::BIGINT FROM videos \
             WHERE id = $1 AND account_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(account_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock video for finalize"))?;

        let Some((existing_len,)) = locked else {
            return Ok(None);
        };

        let parts: Vec<(i32, Vec<u8>)> = sqlx::query_as(
            "SELECT part, content FROM video_chunks WHERE video_id = $1 ORDER BY part ASC",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error("Failed to read chunks"))?;

        if parts.is_empty() {
            return Ok(Some(match existing_len {
                Some(len) => FinalizeOutcome::AlreadyCommitted { size: len as usize },
                None => FinalizeOutcome::NothingToFinalize,
            }));
        }

        let count = parts.len();
        let content = assemble(parts);
        let size = content.len();

        sqlx::query("UPDATE videos SET content = $2, committed_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(content)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to write merged content"))?;

        sqlx::query("DELETE FROM video_chunks WHERE video_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete merged chunks"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit finalize"))?;

        debug!(video_id = %id, parts = count, size, "Merged chunks");
        Ok(Some(FinalizeOutcome::Committed { parts: count, size }))
    }

    async fn purge_stale_chunks(&self, older_than: Duration) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM video_chunks \
             WHERE uploaded_at < NOW() - make_interval(secs => $1)",
        )
        .bind(older_than.num_seconds() as f64)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to purge stale chunks"))?;

        Ok(result.rows_affected())
    }
}
