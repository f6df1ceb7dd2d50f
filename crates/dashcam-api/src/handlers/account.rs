//! Account handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use serde_json::{Map, Value};

use dashcam_service::account::CreateAccountRequest;

use crate::dto::response::AccountResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, JsonBody};
use crate::state::AppState;

/// POST /Accounts
pub async fn create_account(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.account_service.create(req).await?;
    let location = format!("/Accounts/{}", account.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(AccountResponse::from(account)),
    ))
}

/// GET /Account
pub async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.account_service.get(&auth).await?;
    Ok(Json(account.into()))
}

/// PATCH /Accounts/{id}
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Map<String, Value>>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.account_service.update(&auth, &id, &patch).await?;
    Ok(Json(account.into()))
}
