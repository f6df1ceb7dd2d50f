//! Share entity model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use dashcam_core::types::{AccountId, ShareId, VideoId};

/// A capability granting unauthenticated read access to one video.
///
/// Shares have no expiry and no revocation.
#[derive(Debug, Clone, FromRow)]
pub struct Share {
    pub id: ShareId,
    pub video_id: VideoId,
    /// Account that minted the link.
    pub created_by: AccountId,
    pub created_at: DateTime<Utc>,
}

/// Data required to store a share.
#[derive(Debug, Clone)]
pub struct NewShare {
    pub id: ShareId,
    pub video_id: VideoId,
    pub created_by: AccountId,
}
