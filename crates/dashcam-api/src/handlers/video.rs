//! Video metadata and content handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};

use dashcam_entity::video::UploadState;
use dashcam_service::video::{RegisterVideoRequest, UploadOutcome};

use super::content::video_body;
use crate::dto::request::ContentQuery;
use crate::dto::response::{ChunkAcceptedResponse, FinalizeResponse, VideoResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, JsonBody, QueryParams};
use crate::state::AppState;

/// GET /Account/Videos
pub async fn list_videos(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, ApiError> {
    let videos = state.video_service.list(&auth).await?;
    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

/// PUT /Account/Videos/{id}
pub async fn register_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<RegisterVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let video = state.video_service.register(&auth, &id, req).await?;
    let location = format!("/Account/Videos/{}", video.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(VideoResponse::from(video)),
    ))
}

/// PUT /Account/Videos/{id}/content?offset=N
pub async fn put_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    QueryParams(query): QueryParams<ContentQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let outcome = state
        .upload_service
        .put_content(&auth, &id, query.offset.as_deref(), body)
        .await?;

    let response = match outcome {
        UploadOutcome::Stored(receipt) => (
            StatusCode::ACCEPTED,
            Json(ChunkAcceptedResponse::from(receipt)),
        )
            .into_response(),
        UploadOutcome::Finalized {
            video_id,
            parts,
            size,
            ..
        } => (
            StatusCode::OK,
            Json(FinalizeResponse {
                id: video_id.to_string(),
                parts,
                size,
                state: UploadState::Committed,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

/// GET /Account/Videos/{id}/content
pub async fn get_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.upload_service.get_content(&auth, &id).await?;
    Ok(video_body(content, &state.config.upload))
}
