//! In-memory implementation of every store trait.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use dashcam_core::error::{AppError, ErrorCode};
use dashcam_core::result::AppResult;
use dashcam_core::types::{AccountId, ShareId, TokenId, VideoId};
use dashcam_entity::account::{Account, AccountChanges, NewAccount};
use dashcam_entity::share::{NewShare, Share};
use dashcam_entity::token::{NewToken, Token, TokenKind};
use dashcam_entity::video::chunk::assemble;
use dashcam_entity::video::{FinalizeOutcome, NewVideo, Video};

use crate::store::{AccountStore, ContentLookup, ShareStore, TokenStore, VideoStore};

#[derive(Debug)]
struct StoredVideo {
    video: Video,
    content: Option<Vec<u8>>,
}

#[derive(Debug)]
struct StoredChunk {
    content: Vec<u8>,
    uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    tokens: HashMap<TokenId, Token>,
    videos: HashMap<VideoId, StoredVideo>,
    chunks: HashMap<VideoId, BTreeMap<i32, StoredChunk>>,
    shares: HashMap<ShareId, Share>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|a| Some(a.id) != except && a.email.eq_ignore_ascii_case(email))
    }

    fn snapshot(&self, stored: &StoredVideo) -> Video {
        let mut video = stored.video.clone();
        video.has_content = stored.content.is_some();
        video.pending_chunks = self
            .chunks
            .get(&video.id)
            .map_or(0, |parts| parts.len() as i64);
        video
    }

    fn owned(&self, id: &VideoId, account_id: AccountId) -> Option<&StoredVideo> {
        self.videos
            .get(id)
            .filter(|stored| stored.video.account_id == account_id)
    }

    fn token_by_hash(&mut self, token_hash: &str) -> Option<&mut Token> {
        self.tokens
            .values_mut()
            .find(|t| t.token_hash == token_hash)
    }
}

/// Store provider backed by process memory. Its clock is `Utc::now()`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks waiting for finalize across all videos.
    pub async fn pending_chunk_count(&self) -> usize {
        self.tables.read().await.chunks.values().map(BTreeMap::len).sum()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&account.email, None) {
            return Err(AppError::constraint(ErrorCode::EmailInUse, "email"));
        }

        let record = Account {
            id: AccountId::new(),
            email: account.email,
            full_name: account.full_name,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        tables.accounts.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .tables
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update(&self, id: AccountId, changes: &AccountChanges) -> AppResult<Option<Account>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(AppError::constraint(ErrorCode::EmailInUse, "email"));
            }
        }

        Ok(tables.accounts.get_mut(&id).map(|account| {
            changes.apply(account);
            account.clone()
        }))
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn issue(&self, token: NewToken) -> AppResult<Token> {
        let now = Utc::now();
        let record = Token {
            id: TokenId::new(),
            token_hash: token.token_hash,
            account_id: token.account_id,
            kind: token.kind,
            expires_at: now + token.ttl,
            active: true,
            last_used: None,
            issued_to: token.issued_to,
            created_at: now,
        };

        let mut tables = self.tables.write().await;
        if tables.tokens.values().any(|t| t.token_hash == record.token_hash) {
            return Err(AppError::internal("Token hash collision"));
        }
        tables.tokens.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_valid(&self, token_hash: &str, kind: TokenKind) -> AppResult<Option<Token>> {
        let now = Utc::now();
        Ok(self
            .tables
            .read()
            .await
            .tokens
            .values()
            .find(|t| t.token_hash == token_hash && t.is_valid_at(kind, now))
            .cloned())
    }

    async fn touch(&self, id: TokenId) -> AppResult<()> {
        if let Some(token) = self.tables.write().await.tokens.get_mut(&id) {
            token.last_used = Some(Utc::now());
        }
        Ok(())
    }

    async fn extend_refresh(&self, token_hash: &str, ttl: Duration) -> AppResult<Option<Token>> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let Some(token) = tables
            .token_by_hash(token_hash)
            .filter(|t| t.is_valid_at(TokenKind::Refresh, now))
        else {
            return Ok(None);
        };

        token.expires_at = token.expires_at.max(now + ttl);
        token.last_used = Some(now);
        Ok(Some(token.clone()))
    }

    async fn deactivate(
        &self,
        token_hash: &str,
        kind: TokenKind,
        account_id: AccountId,
    ) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.token_by_hash(token_hash) {
            Some(token) if token.active && token.kind == kind && token.account_id == account_id => {
                token.active = false;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn purge_dead(&self) -> AppResult<u64> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let before = tables.tokens.len();
        tables
            .tokens
            .retain(|_, t| t.active && t.expires_at > now);
        Ok((before - tables.tokens.len()) as u64)
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn create(&self, video: NewVideo) -> AppResult<Video> {
        let mut tables = self.tables.write().await;
        if tables.videos.contains_key(&video.id) {
            return Err(AppError::constraint(
                ErrorCode::VideoAlreadyRegistered,
                "id",
            ));
        }

        let now = Utc::now();
        let record = Video {
            id: video.id.clone(),
            account_id: video.account_id,
            thumbnail: video.thumbnail,
            started: video.started,
            size: video.size,
            length: video.length,
            start_lat: video.start_lat,
            start_long: video.start_long,
            end_lat: video.end_lat,
            end_long: video.end_long,
            created_at: now,
            committed_at: video.content.as_ref().map(|_| now),
            has_content: video.content.is_some(),
            pending_chunks: 0,
        };
        tables.videos.insert(
            video.id,
            StoredVideo {
                video: record.clone(),
                content: video.content,
            },
        );
        Ok(record)
    }

    async fn list_by_account(&self, account_id: AccountId) -> AppResult<Vec<Video>> {
        let tables = self.tables.read().await;
        let mut videos: Vec<Video> = tables
            .videos
            .values()
            .filter(|stored| stored.video.account_id == account_id)
            .map(|stored| tables.snapshot(stored))
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(videos)
    }

    async fn find_owned(&self, id: &VideoId, account_id: AccountId) -> AppResult<Option<Video>> {
        let tables = self.tables.read().await;
        Ok(tables
            .owned(id, account_id)
            .map(|stored| tables.snapshot(stored)))
    }

    async fn content_owned(
        &self,
        id: &VideoId,
        account_id: AccountId,
    ) -> AppResult<ContentLookup> {
        let tables = self.tables.read().await;
        Ok(match tables.owned(id, account_id) {
            None => ContentLookup::NotFound,
            Some(StoredVideo { content: None, .. }) => ContentLookup::Pending,
            Some(StoredVideo {
                content: Some(bytes),
                ..
            }) => ContentLookup::Ready(bytes.clone()),
        })
    }

    async fn put_chunk(
        &self,
        id: &VideoId,
        account_id: AccountId,
        part: i32,
        bytes: Vec<u8>,
    ) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.owned(id, account_id).is_none() {
            return Ok(false);
        }

        tables.chunks.entry(id.clone()).or_default().insert(
            part,
            StoredChunk {
                content: bytes,
                uploaded_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn finalize(
        &self,
        id: &VideoId,
        account_id: AccountId,
    ) -> AppResult<Option<FinalizeOutcome>> {
        let mut tables = self.tables.write().await;
        let Some(existing_len) = tables
            .owned(id, account_id)
            .map(|stored| stored.content.as_ref().map(Vec::len))
        else {
            return Ok(None);
        };

        let parts: Vec<(i32, Vec<u8>)> = tables
            .chunks
            .remove(id)
            .unwrap_or_default()
            .into_iter()
            .map(|(part, chunk)| (part, chunk.content))
            .collect();

        if parts.is_empty() {
            return Ok(Some(match existing_len {
                Some(size) => FinalizeOutcome::AlreadyCommitted { size },
                None => FinalizeOutcome::NothingToFinalize,
            }));
        }

        let count = parts.len();
        let content = assemble(parts);
        let size = content.len();
        if let Some(stored) = tables.videos.get_mut(id) {
            stored.content = Some(content);
            stored.video.committed_at = Some(Utc::now());
        }
        Ok(Some(FinalizeOutcome::Committed { parts: count, size }))
    }

    async fn purge_stale_chunks(&self, older_than: Duration) -> AppResult<u64> {
        // A cutoff before the representable range means nothing is old enough.
        let Some(cutoff) = Utc::now().checked_sub_signed(older_than) else {
            return Ok(0);
        };
        let mut tables = self.tables.write().await;
        let mut removed = 0u64;
        for parts in tables.chunks.values_mut() {
            let before = parts.len();
            parts.retain(|_, chunk| chunk.uploaded_at >= cutoff);
            removed += (before - parts.len()) as u64;
        }
        tables.chunks.retain(|_, parts| !parts.is_empty());
        Ok(removed)
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn create(&self, share: NewShare) -> AppResult<Share> {
        let mut tables = self.tables.write().await;
        if !tables.videos.contains_key(&share.video_id) {
            return Err(AppError::internal("Share references an unknown video"));
        }

        let record = Share {
            id: share.id,
            video_id: share.video_id,
            created_by: share.created_by,
            created_at: Utc::now(),
        };
        tables.shares.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn shared_content(&self, id: &ShareId) -> AppResult<ContentLookup> {
        let tables = self.tables.read().await;
        let Some(share) = tables.shares.get(id) else {
            return Ok(ContentLookup::NotFound);
        };

        Ok(match tables.videos.get(&share.video_id) {
            None => ContentLookup::NotFound,
            Some(StoredVideo { content: None, .. }) => ContentLookup::Pending,
            Some(StoredVideo {
                content: Some(bytes),
                ..
            }) => ContentLookup::Ready(bytes.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    async fn account(store: &MemoryStore, email: &str) -> Account {
        AccountStore::create(
            store,
            NewAccount {
                email: email.into(),
                full_name: "Driver".into(),
                password_hash: "hash".into(),
            },
        )
        .await
        .unwrap()
    }

    fn new_video(owner: AccountId) -> NewVideo {
        NewVideo {
            id: VideoId::parse(VIDEO).unwrap(),
            account_id: owner,
            thumbnail: None,
            started: Utc::now(),
            size: 4,
            length: 1,
            start_lat: None,
            start_long: None,
            end_lat: None,
            end_long: None,
            content: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_violation() {
        let store = MemoryStore::new();
        let first = account(&store, "a@example.com").await;
        let err = AccountStore::create(
            &store,
            NewAccount {
                email: "A@Example.com".into(),
                full_name: "Other".into(),
                password_hash: "other".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConstraintViolation);

        let kept = store.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(kept.full_name, "Driver");
    }

    #[tokio::test]
    async fn test_refresh_extension_never_moves_backwards() {
        let store = MemoryStore::new();
        let owner = account(&store, "r@example.com").await;
        let issued = store
            .issue(NewToken {
                token_hash: "refresh".into(),
                account_id: owner.id,
                kind: TokenKind::Refresh,
                ttl: Duration::days(90),
                issued_to: None,
            })
            .await
            .unwrap();

        let extended = store
            .extend_refresh("refresh", Duration::days(60))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(extended.expires_at, issued.expires_at);
        assert!(extended.last_used.is_some());
    }

    #[tokio::test]
    async fn test_deactivate_only_matches_owner_and_kind() {
        let store = MemoryStore::new();
        let owner = account(&store, "d@example.com").await;
        store
            .issue(NewToken {
                token_hash: "access".into(),
                account_id: owner.id,
                kind: TokenKind::Access,
                ttl: Duration::hours(1),
                issued_to: None,
            })
            .await
            .unwrap();

        assert_eq!(
            store
                .deactivate("access", TokenKind::Refresh, owner.id)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .deactivate("access", TokenKind::Access, AccountId::new())
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            store
                .deactivate("access", TokenKind::Access, owner.id)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .deactivate("access", TokenKind::Access, owner.id)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_finalize_merges_by_part_and_clears_chunks() {
        let store = MemoryStore::new();
        let owner = account(&store, "v@example.com").await;
        let video = VideoStore::create(&store, new_video(owner.id)).await.unwrap();

        assert!(store.put_chunk(&video.id, owner.id, 1, b"CD".to_vec()).await.unwrap());
        assert!(store.put_chunk(&video.id, owner.id, 0, b"XX".to_vec()).await.unwrap());
        assert!(store.put_chunk(&video.id, owner.id, 0, b"AB".to_vec()).await.unwrap());
        assert_eq!(store.pending_chunk_count().await, 2);

        let outcome = store.finalize(&video.id, owner.id).await.unwrap();
        assert_eq!(outcome, Some(FinalizeOutcome::Committed { parts: 2, size: 4 }));
        assert_eq!(store.pending_chunk_count().await, 0);
        assert_eq!(
            store.content_owned(&video.id, owner.id).await.unwrap(),
            ContentLookup::Ready(b"ABCD".to_vec())
        );

        let again = store.finalize(&video.id, owner.id).await.unwrap();
        assert_eq!(again, Some(FinalizeOutcome::AlreadyCommitted { size: 4 }));
    }

    #[tokio::test]
    async fn test_chunks_are_refused_for_foreign_videos() {
        let store = MemoryStore::new();
        let owner = account(&store, "o@example.com").await;
        let intruder = account(&store, "i@example.com").await;
        let video = VideoStore::create(&store, new_video(owner.id)).await.unwrap();

        assert!(!store.put_chunk(&video.id, intruder.id, 0, b"x".to_vec()).await.unwrap());
        assert_eq!(store.finalize(&video.id, intruder.id).await.unwrap(), None);
        assert_eq!(store.pending_chunk_count().await, 0);
    }

    #[tokio::test]
    async fn test_stale_chunks_are_purged() {
        let store = MemoryStore::new();
        let owner = account(&store, "p@example.com").await;
        let video = VideoStore::create(&store, new_video(owner.id)).await.unwrap();
        store.put_chunk(&video.id, owner.id, 0, b"x".to_vec()).await.unwrap();

        assert_eq!(store.purge_stale_chunks(Duration::hours(1)).await.unwrap(), 0);
        assert_eq!(store.purge_stale_chunks(Duration::seconds(-1)).await.unwrap(), 1);
        assert_eq!(store.pending_chunk_count().await, 0);
    }

    #[tokio::test]
    async fn test_purge_threshold_beyond_calendar_keeps_chunks() {
        let store = MemoryStore::new();
        let owner = account(&store, "far@example.com").await;
        let video = VideoStore::create(&store, new_video(owner.id)).await.unwrap();
        store.put_chunk(&video.id, owner.id, 0, b"x".to_vec()).await.unwrap();

        let ancient = Duration::try_hours(2_500_000_000).unwrap();
        assert_eq!(store.purge_stale_chunks(ancient).await.unwrap(), 0);
        assert_eq!(store.pending_chunk_count().await, 1);
    }
}
