//! Share repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use dashcam_core::error::{AppError, ErrorKind};
use dashcam_core::result::AppResult;
use dashcam_core::types::ShareId;
use dashcam_entity::share::{NewShare, Share};

use crate::store::{ContentLookup, ShareStore};

/// Repository for share links.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn create(&self, share: NewShare) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO shares (id, video_id, created_by) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&share.id)
        .bind(&share.video_id)
        .bind(share.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create share", e))
    }

    async fn shared_content(&self, id: &ShareId) -> AppResult<ContentLookup> {
        let row: Option<(Option<Vec<u8>>,)> = sqlx::query_as(
            "SELECT v.content FROM shares s JOIN videos v ON v.id = s.video_id WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load shared content", e)
        })?;

        Ok(match row {
            None => ContentLookup::NotFound,
            Some((None,)) => ContentLookup::Pending,
            Some((Some(bytes),)) => ContentLookup::Ready(bytes),
        })
    }
}
