//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use dashcam_auth::{Authenticator, PasswordHasher, PasswordValidator, TokenIssuer};
use dashcam_core::config::AppConfig;
use dashcam_core::result::AppResult;
use dashcam_database::Stores;
use dashcam_service::{AccountService, LinkService, ShareService, UploadService, VideoService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Store handles for the configured provider
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token validation
    pub authenticator: Arc<Authenticator>,
    /// Token endpoint grants and logout
    pub token_issuer: Arc<TokenIssuer>,

    // ── Services ─────────────────────────────────────────────
    /// Account registration and self-service
    pub account_service: Arc<AccountService>,
    /// Video metadata
    pub video_service: Arc<VideoService>,
    /// Chunked upload and owner download
    pub upload_service: Arc<UploadService>,
    /// Share links
    pub share_service: Arc<ShareService>,
}

impl AppState {
    /// Wire every service over `stores`.
    pub fn new(config: AppConfig, stores: Stores) -> AppResult<Self> {
        let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let policy = Arc::new(PasswordValidator::new(&config.auth));

        let authenticator = Arc::new(Authenticator::new(Arc::clone(&stores.tokens)));
        let token_issuer = Arc::new(TokenIssuer::new(
            Arc::clone(&stores.accounts),
            Arc::clone(&stores.tokens),
            Arc::clone(&hasher),
            &config.auth,
        ));

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&stores.accounts),
            hasher,
            policy,
        ));
        let video_service = Arc::new(VideoService::new(Arc::clone(&stores.videos)));
        let upload_service = Arc::new(UploadService::new(Arc::clone(&stores.videos)));
        let share_service = Arc::new(ShareService::new(
            Arc::clone(&stores.videos),
            Arc::clone(&stores.shares),
            Arc::new(LinkService::new()),
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            authenticator,
            token_issuer,
            account_service,
            video_service,
            upload_service,
            share_service,
        })
    }
}
