//! Token entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dashcam_core::types::{AccountId, TokenId};

/// Which grant a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "token_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived bearer credential for API calls.
    Access,
    /// Long-lived credential that mints access tokens.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// A persisted token row. Only the SHA-256 digest of the secret is stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Token {
    pub id: TokenId,
    /// Hex SHA-256 of the opaque token value.
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub account_id: AccountId,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    /// Cleared by logout; an inactive token never authenticates.
    pub active: bool,
    pub last_used: Option<DateTime<Utc>>,
    /// Client address the token was issued to, best effort.
    pub issued_to: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Token {
    /// Whether the token authenticates for `kind` at instant `now`.
    pub fn is_valid_at(&self, kind: TokenKind, now: DateTime<Utc>) -> bool {
        self.active && self.kind == kind && self.expires_at > now
    }
}

/// Data required to issue a token. Expiry is computed by the store from its
/// own clock as `now + ttl`.
#[derive(Debug, Clone)]
pub struct NewToken {
    pub token_hash: String,
    pub account_id: AccountId,
    pub kind: TokenKind,
    pub ttl: Duration,
    pub issued_to: Option<String>,
}
