//! Store traits implemented by every persistence provider.
//!
//! The store is the sole arbiter of consistency: uniqueness of emails,
//! video ids and `(video, part)` chunk keys is enforced here, token validity
//! is judged against the store's own clock, and finalize is serialised per
//! video inside the store.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::Duration;

use dashcam_core::result::AppResult;
use dashcam_core::types::{AccountId, ShareId, TokenId, VideoId};
use dashcam_entity::account::{Account, AccountChanges, NewAccount};
use dashcam_entity::share::{NewShare, Share};
use dashcam_entity::token::{NewToken, Token, TokenKind};
use dashcam_entity::video::{FinalizeOutcome, NewVideo, Video};

/// Outcome of a content read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLookup {
    /// No such video (or not visible to the caller).
    NotFound,
    /// The video exists but has no committed content.
    Pending,
    /// Committed content bytes.
    Ready(Vec<u8>),
}

/// Account persistence.
#[async_trait]
pub trait AccountStore: Send + Sync + Debug {
    /// Insert an account. A duplicate email (case-insensitive) yields a
    /// `Constraint` error with code `EmailInUse`.
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>>;

    /// Case-insensitive lookup by login name.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Apply a partial update. `None` when the account does not exist.
    async fn update(&self, id: AccountId, changes: &AccountChanges) -> AppResult<Option<Account>>;
}

/// Token persistence. All expiry arithmetic uses the store clock.
#[async_trait]
pub trait TokenStore: Send + Sync + Debug {
    /// Persist a token expiring `ttl` after the store's current time.
    async fn issue(&self, token: NewToken) -> AppResult<Token>;

    /// Fetch a token that is active, of `kind`, and unexpired right now.
    async fn find_valid(&self, token_hash: &str, kind: TokenKind) -> AppResult<Option<Token>>;

    /// Stamp `last_used` with the store clock.
    async fn touch(&self, id: TokenId) -> AppResult<()>;

    /// Atomically validate a refresh token and push its expiry to at least
    /// `now + ttl`, stamping `last_used`. Never moves expiry backwards.
    async fn extend_refresh(&self, token_hash: &str, ttl: Duration) -> AppResult<Option<Token>>;

    /// Deactivate one active token of `kind` owned by `account_id`.
    /// Returns the number of rows changed.
    async fn deactivate(
        &self,
        token_hash: &str,
        kind: TokenKind,
        account_id: AccountId,
    ) -> AppResult<u64>;

    /// Delete tokens that are inactive or expired.
    async fn purge_dead(&self) -> AppResult<u64>;
}

/// Video metadata, chunk and content persistence.
#[async_trait]
pub trait VideoStore: Send + Sync + Debug {
    /// Register a video. A duplicate id yields a `Constraint` error with
    /// code `VideoAlreadyRegistered`.
    async fn create(&self, video: NewVideo) -> AppResult<Video>;

    /// Newest first.
    async fn list_by_account(&self, account_id: AccountId) -> AppResult<Vec<Video>>;

    async fn find_owned(&self, id: &VideoId, account_id: AccountId) -> AppResult<Option<Video>>;

    /// Content of a video owned by `account_id`.
    async fn content_owned(&self, id: &VideoId, account_id: AccountId)
    -> AppResult<ContentLookup>;

    /// Insert or overwrite chunk `(id, part)`. Returns `false` when the
    /// video does not exist or is not owned by `account_id`.
    async fn put_chunk(
        &self,
        id: &VideoId,
        account_id: AccountId,
        part: i32,
        bytes: Vec<u8>,
    ) -> AppResult<bool>;

    /// Merge pending chunks in ascending part order into the content,
    /// then delete them, as one serialised step per video. `None` when the
    /// video does not exist or is not owned by `account_id`.
    async fn finalize(
        &self,
        id: &VideoId,
        account_id: AccountId,
    ) -> AppResult<Option<FinalizeOutcome>>;

    /// Delete chunks not written for longer than `older_than`.
    async fn purge_stale_chunks(&self, older_than: Duration) -> AppResult<u64>;
}

/// Share link persistence.
#[async_trait]
pub trait ShareStore: Send + Sync + Debug {
    async fn create(&self, share: NewShare) -> AppResult<Share>;

    /// Content of the video bound to a share, with no ownership check.
    async fn shared_content(&self, id: &ShareId) -> AppResult<ContentLookup>;
}
