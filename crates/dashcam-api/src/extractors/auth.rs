//! `AuthUser` extractor: validates the bearer token and injects the caller's
//! context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use dashcam_auth::Identity;
use dashcam_service::RequestContext;

use super::client_ip::ClientIp;
use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Service-level request context.
    pub ctx: RequestContext,
    /// The validated token, needed for logout.
    pub identity: Identity,
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A header that is not valid visible ASCII is malformed, not absent.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        let identity = state.authenticator.authenticate(header).await?;
        let client_ip = ClientIp::from_parts(parts).0;

        Ok(Self {
            ctx: RequestContext::from_identity(&identity, client_ip),
            identity,
        })
    }
}
