//! OAuth2 token endpoint handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, PRAGMA};
use axum::response::IntoResponse;

use dashcam_auth::GrantRequest;

use crate::dto::request::RevokeRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientIp, FormOrJson};
use crate::state::AppState;

/// POST /oauth/token
pub async fn issue_token(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    FormOrJson(req): FormOrJson<GrantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let grant = state.token_issuer.grant(req, client_ip).await?;

    Ok((
        StatusCode::CREATED,
        [(CACHE_CONTROL, "no-store"), (PRAGMA, "no-cache")],
        Json(grant),
    ))
}

/// DELETE /oauth/token
pub async fn revoke_token(
    State(state): State<AppState>,
    auth: AuthUser,
    FormOrJson(req): FormOrJson<RevokeRequest>,
) -> Result<StatusCode, ApiError> {
    let refresh_token = req.refresh_token.as_deref().filter(|t| !t.is_empty());
    state
        .token_issuer
        .revoke(&auth.identity, refresh_token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
