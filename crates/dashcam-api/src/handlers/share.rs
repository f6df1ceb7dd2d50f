//! Share link handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use crate::dto::request::CreateShareRequest;
use crate::dto::response::ShareResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, JsonBody};
use crate::handlers::content::video_body;
use crate::state::AppState;

/// POST /Share
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<CreateShareRequest>,
) -> Result<Json<ShareResponse>, ApiError> {
    let share_id = state
        .share_service
        .create(&auth, req.id.as_deref())
        .await?;
    Ok(Json(ShareResponse { share_id }))
}

/// GET /Share/{token}, no authentication.
pub async fn download_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.share_service.resolve(&token).await?;
    Ok(video_body(content, &state.config.upload))
}
