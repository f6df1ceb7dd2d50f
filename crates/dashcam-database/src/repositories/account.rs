//! Account repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use dashcam_core::error::{AppError, ErrorCode, ErrorKind};
use dashcam_core::result::AppResult;
use dashcam_core::types::AccountId;
use dashcam_entity::account::{Account, AccountChanges, NewAccount};

use crate::store::AccountStore;

/// Unique index on `LOWER(email)`.
const EMAIL_KEY: &str = "accounts_email_key";

/// Repository for account rows.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_KEY) => {
            AppError::constraint(ErrorCode::EmailInUse, "email")
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, email, full_name, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(AccountId::new())
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create account"))
    }

    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    async fn update(&self, id: AccountId, changes: &AccountChanges) -> AppResult<Option<Account>> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET \
                email = COALESCE($2, email), \
                full_name = COALESCE($3, full_name), \
                password_hash = COALESCE($4, password_hash) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.full_name.as_deref())
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update account"))
    }
}
