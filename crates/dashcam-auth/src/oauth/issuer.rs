//! Token issuance and revocation.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tracing::info;

use dashcam_core::config::auth::AuthConfig;
use dashcam_core::error::{AppError, ErrorCode, FieldErrors};
use dashcam_core::result::AppResult;
use dashcam_core::types::AccountId;
use dashcam_database::store::{AccountStore, TokenStore};
use dashcam_entity::token::{NewToken, TokenKind};

use crate::authenticator::Identity;
use crate::password::PasswordHasher;
use crate::token::{TokenGenerator, hash_token};

use super::grant::{Grant, GrantRequest};

/// Successful token endpoint response body.
#[derive(Debug, Clone, Serialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub scope: &'static str,
    pub expires_in: i64,
}

/// Runs the `password` and `refresh_token` grants and logout.
#[derive(Clone)]
pub struct TokenIssuer {
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<dyn TokenStore>,
    hasher: Arc<PasswordHasher>,
    generator: TokenGenerator,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<dyn TokenStore>,
        hasher: Arc<PasswordHasher>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            accounts,
            tokens,
            hasher,
            generator: TokenGenerator::new(config.token_bytes),
            access_ttl: Duration::seconds(config.access_token_ttl_seconds),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
        }
    }

    /// Lifetime of new access tokens in seconds.
    pub fn expires_in(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Validate the request and run the grant it names. All parameter and
    /// credential problems come back as one `ValidationFailed` error.
    pub async fn grant(
        &self,
        request: GrantRequest,
        issued_to: Option<String>,
    ) -> AppResult<TokenGrant> {
        let grant = request.validate().map_err(FieldErrors::into_error)?;

        match grant {
            Grant::Password { username, password } => {
                self.password_grant(&username, &password, issued_to).await
            }
            Grant::RefreshToken { refresh_token } => {
                self.refresh_grant(refresh_token, issued_to).await
            }
        }
    }

    async fn password_grant(
        &self,
        username: &str,
        password: &str,
        issued_to: Option<String>,
    ) -> AppResult<TokenGrant> {
        let Some(account) = self.accounts.find_by_email(username).await? else {
            return Err(AppError::invalid_field(ErrorCode::UnknownUsername, "username"));
        };

        if !self.hasher.verify_password(password, &account.password_hash)? {
            return Err(AppError::invalid_field(ErrorCode::IncorrectPassword, "password"));
        }

        let refresh_token = self
            .mint(account.id, TokenKind::Refresh, self.refresh_ttl, issued_to.clone())
            .await?;
        let access_token = self
            .mint(account.id, TokenKind::Access, self.access_ttl, issued_to)
            .await?;

        info!(account_id = %account.id, "Password grant issued tokens");
        Ok(self.response(access_token, refresh_token))
    }

    async fn refresh_grant(
        &self,
        refresh_token: String,
        issued_to: Option<String>,
    ) -> AppResult<TokenGrant> {
        let Some(token) = self
            .tokens
            .extend_refresh(&hash_token(&refresh_token), self.refresh_ttl)
            .await?
        else {
            return Err(AppError::invalid_field(
                ErrorCode::RefreshTokenRejected,
                "refresh_token",
            ));
        };

        let access_token = self
            .mint(token.account_id, TokenKind::Access, self.access_ttl, issued_to)
            .await?;

        info!(account_id = %token.account_id, "Refresh grant issued access token");
        Ok(self.response(access_token, refresh_token))
    }

    async fn mint(
        &self,
        account_id: AccountId,
        kind: TokenKind,
        ttl: Duration,
        issued_to: Option<String>,
    ) -> AppResult<String> {
        let value = self.generator.generate();
        self.tokens
            .issue(NewToken {
                token_hash: hash_token(&value),
                account_id,
                kind,
                ttl,
                issued_to,
            })
            .await?;
        Ok(value)
    }

    fn response(&self, access_token: String, refresh_token: String) -> TokenGrant {
        TokenGrant {
            access_token,
            refresh_token,
            token_type: "Bearer",
            scope: "all",
            expires_in: self.expires_in(),
        }
    }

    /// Logout: deactivate the caller's access token and, when supplied, one
    /// of the caller's refresh tokens. Both deactivations are attempted;
    /// each one that changes no row is reported on its own.
    pub async fn revoke(&self, identity: &Identity, refresh_token: Option<&str>) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        let revoked_access = self
            .tokens
            .deactivate(
                &hash_token(&identity.access_token),
                TokenKind::Access,
                identity.account_id,
            )
            .await?;
        if revoked_access != 1 {
            errors.add(ErrorCode::InvalidAccessToken, "access_token");
        }

        if let Some(refresh_token) = refresh_token {
            let revoked_refresh = self
                .tokens
                .deactivate(
                    &hash_token(refresh_token),
                    TokenKind::Refresh,
                    identity.account_id,
                )
                .await?;
            if revoked_refresh != 1 {
                errors.add(ErrorCode::InvalidRefreshToken, "refresh_token");
            }
        }

        let envelope = match errors.as_slice() {
            [only] if only.code == ErrorCode::InvalidAccessToken.code() => {
                ErrorCode::InvalidAccessToken
            }
            [only] if only.code == ErrorCode::InvalidRefreshToken.code() => {
                ErrorCode::InvalidRefreshToken
            }
            _ => ErrorCode::ValidationFailed,
        };
        errors.into_result_as(envelope)?;

        info!(account_id = %identity.account_id, "Tokens revoked");
        Ok(())
    }
}
