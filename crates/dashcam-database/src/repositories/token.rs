//! Token repository implementation.
//!
//! Every validity check compares against `NOW()` so the database clock is
//! the only clock that matters.

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;

use dashcam_core::error::{AppError, ErrorKind};
use dashcam_core::result::AppResult;
use dashcam_core::types::{AccountId, TokenId};
use dashcam_entity::token::{NewToken, Token, TokenKind};

use crate::store::TokenStore;

/// Repository for bearer and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn seconds(ttl: Duration) -> f64 {
    ttl.num_milliseconds() as f64 / 1000.0
}

#[async_trait]
impl TokenStore for TokenRepository {
    async fn issue(&self, token: NewToken) -> AppResult<Token> {
        sqlx::query_as::<_, Token>(
            "INSERT INTO tokens (id, token_hash, account_id, kind, expires_at, issued_to) \
             VALUES ($1, $2, $3, $4, NOW() + make_interval(secs => $5), $6) \
             RETURNING *",
        )
        .bind(TokenId::new())
        .bind(&token.token_hash)
        .bind(token.account_id)
        .bind(token.kind)
        .bind(seconds(token.ttl))
        .bind(token.issued_to.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to issue token", e))
    }

    async fn find_valid(&self, token_hash: &str, kind: TokenKind) -> AppResult<Option<Token>> {
        sqlx::query_as::<_, Token>(
            "SELECT * FROM tokens \
             WHERE token_hash = $1 AND kind = $2 AND active AND expires_at > NOW()",
        )
        .bind(token_hash)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up token", e))
    }

    async fn touch(&self, id: TokenId) -> AppResult<()> {
        sqlx::query("UPDATE tokens SET last_used = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update token last_used", e)
            })?;
        Ok(())
    }

    async fn extend_refresh(&self, token_hash: &str, ttl: Duration) -> AppResult<Option<Token>> {
        sqlx::query_as::<_, Token>(
            "UPDATE tokens SET \
                expires_at = GREATEST(expires_at, NOW() + make_interval(secs => $2)), \
                last_used = NOW() \
             WHERE token_hash = $1 AND kind = 'refresh' AND active AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(token_hash)
        .bind(seconds(ttl))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to extend refresh token", e)
        })
    }

    async fn deactivate(
        &self,
        token_hash: &str,
        kind: TokenKind,
        account_id: AccountId,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE tokens SET active = FALSE \
             WHERE token_hash = $1 AND kind = $2 AND account_id = $3 AND active",
        )
        .bind(token_hash)
        .bind(kind)
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;

        Ok(result.rows_affected())
    }

    async fn purge_dead(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE NOT active OR expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge dead tokens", e)
            })?;

        Ok(result.rows_affected())
    }
}
