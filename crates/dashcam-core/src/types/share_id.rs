//! Opaque share link identifier.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Width of a share identifier in bytes.
pub const SHARE_ID_BYTES: usize = 32;

/// Random binary key of a share link.
///
/// Travels to clients as unpadded base64url. The bytes themselves are the
/// only access control on a shared video, so they must come from a
/// cryptographically secure source.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShareId(Vec<u8>);

impl ShareId {
    /// Wrap raw bytes produced by a secure generator.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a client-supplied token. Returns `None` for anything that is
    /// not unpadded base64url of the expected width.
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        (bytes.len() == SHARE_ID_BYTES).then_some(Self(bytes))
    }

    /// Encode for transport.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Postgres> for ShareId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Vec<u8> as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for ShareId {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Vec<u8> as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShareId {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        <Vec<u8> as sqlx::Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
    }
}

// Never print the capability itself.
impl fmt::Debug for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShareId").field(&"<redacted>").finish()
    }
}
