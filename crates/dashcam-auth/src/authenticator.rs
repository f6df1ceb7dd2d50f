//! Bearer-token authentication.
//!
//! Turns the raw `Authorization` header into an [`Identity`] or one of the
//! three authentication failures. Validity is decided by the token store
//! against its own clock; the caller's clock is never consulted.

use std::sync::Arc;

use tracing::{debug, warn};

use dashcam_core::error::{AppError, ErrorCode, ErrorKind};
use dashcam_core::result::AppResult;
use dashcam_core::types::{AccountId, TokenId};
use dashcam_database::store::TokenStore;
use dashcam_entity::token::TokenKind;

use crate::token::hash_token;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Identity {
    pub account_id: AccountId,
    pub token_id: TokenId,
    /// The presented access token, needed to revoke it on logout.
    pub access_token: String,
}

/// Validates access tokens presented on protected endpoints.
#[derive(Debug, Clone)]
pub struct Authenticator {
    tokens: Arc<dyn TokenStore>,
}

impl Authenticator {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    /// Authenticate a request from its `Authorization` header value.
    ///
    /// - header absent: `NoAuthorizationProvided`
    /// - header not `Bearer <token>`: `MalformedAuthorization`
    /// - token unknown, revoked, of the wrong kind or expired: `Unauthorized`
    ///
    /// On success `last_used` is stamped once, in the background.
    pub async fn authenticate(&self, header: Option<&str>) -> AppResult<Identity> {
        let header =
            header.ok_or_else(|| AppError::unauthorized(ErrorCode::NoAuthorizationProvided))?;
        let presented = parse_bearer(header).ok_or_else(|| {
            AppError::from_code(ErrorKind::Validation, ErrorCode::MalformedAuthorization)
        })?;

        let token = self
            .tokens
            .find_valid(&hash_token(presented), TokenKind::Access)
            .await?
            .ok_or_else(|| AppError::unauthorized(ErrorCode::Unauthorized))?;

        let store = Arc::clone(&self.tokens);
        let token_id = token.id;
        tokio::spawn(async move {
            if let Err(e) = store.touch(token_id).await {
                warn!(token_id = %token_id, error = %e, "Failed to record token use");
            }
        });

        debug!(account_id = %token.account_id, "Request authenticated");
        Ok(Identity {
            account_id: token.account_id,
            token_id: token.id,
            access_token: presented.to_string(),
        })
    }
}

/// Extract `<token>` from `Bearer <token>`. The scheme is matched
/// case-insensitively; exactly one non-empty credential must follow it.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let credential = parts.next()?;
    if !scheme.eq_ignore_ascii_case("bearer") || parts.next().is_some() {
        return None;
    }
    Some(credential)
}
