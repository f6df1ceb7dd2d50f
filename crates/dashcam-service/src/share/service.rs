//! Share creation and public resolution.

use std::sync::Arc;

use tracing::info;

use dashcam_core::error::{AppError, ErrorCode};
use dashcam_core::result::AppResult;
use dashcam_core::types::{ShareId, VideoId};
use dashcam_database::{ContentLookup, ShareStore, VideoStore};
use dashcam_entity::share::NewShare;

use super::link::LinkService;
use crate::context::RequestContext;

/// Creates share links for owned videos and resolves them anonymously.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Video store, for the ownership check.
    videos: Arc<dyn VideoStore>,
    /// Share store.
    shares: Arc<dyn ShareStore>,
    /// Id generator.
    links: Arc<LinkService>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        videos: Arc<dyn VideoStore>,
        shares: Arc<dyn ShareStore>,
        links: Arc<LinkService>,
    ) -> Self {
        Self {
            videos,
            shares,
            links,
        }
    }

    /// Create a share for one of the caller's videos and return its
    /// URL-safe token.
    pub async fn create(&self, ctx: &RequestContext, raw_video_id: Option<&str>) -> AppResult<String> {
        let Some(raw) = raw_video_id.filter(|s| !s.is_empty()) else {
            return Err(AppError::invalid_field(ErrorCode::InvalidVideoId, "id"));
        };
        let video_id = VideoId::parse(raw)
            .map_err(|_| AppError::invalid_field(ErrorCode::InvalidVideoId, "id"))?;

        if self
            .videos
            .find_owned(&video_id, ctx.account_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(ErrorCode::VideoNotFound));
        }

        let share = self
            .shares
            .create(NewShare {
                id: self.links.generate(),
                video_id,
                created_by: ctx.account_id,
            })
            .await?;

        info!(video_id = %share.video_id, account_id = %ctx.account_id, "Share created");
        Ok(share.id.encode())
    }

    /// Content behind a share token. Malformed, unknown and uncommitted
    /// shares are indistinguishable to the caller.
    pub async fn resolve(&self, token: &str) -> AppResult<Vec<u8>> {
        let id = ShareId::decode(token)
            .ok_or_else(|| AppError::not_found(ErrorCode::VideoNotFound))?;

        match self.shares.shared_content(&id).await? {
            ContentLookup::Ready(content) => Ok(content),
            ContentLookup::Pending | ContentLookup::NotFound => {
                Err(AppError::not_found(ErrorCode::VideoNotFound))
            }
        }
    }
}
