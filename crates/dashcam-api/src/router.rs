//! Route definitions for the dashcam HTTP API.
//!
//! Paths keep the resource casing clients already use (`/Accounts`,
//! `/Account/Videos`, `/Share`). The router receives `AppState` and passes
//! it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.request_body_limit_bytes;

    Router::new()
        .merge(account_routes())
        .merge(oauth_routes())
        .merge(video_routes(state.config.upload.max_chunk_bytes))
        .merge(share_routes())
        .route("/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Registration and self-service
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/Accounts", post(handlers::account::create_account))
        .route("/Accounts/{id}", patch(handlers::account::update_account))
        .route("/Account", get(handlers::account::get_account))
}

/// Token grants and logout
fn oauth_routes() -> Router<AppState> {
    Router::new().route(
        "/oauth/token",
        post(handlers::oauth::issue_token).delete(handlers::oauth::revoke_token),
    )
}

/// Metadata, chunk upload and owner download
fn video_routes(max_chunk_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/Account/Videos", get(handlers::video::list_videos))
        .route("/Account/Videos/{id}", put(handlers::video::register_video))
        .route(
            "/Account/Videos/{id}/content",
            put(handlers::video::put_content)
                .layer(DefaultBodyLimit::max(max_chunk_bytes))
                .get(handlers::video::get_content),
        )
}

/// Share creation and anonymous download
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/Share", post(handlers::share::create_share))
        .route("/Share/{token}", get(handlers::share::download_shared))
}
