//! Content-addressed video identifier.
//!
//! A video is identified by the hex-encoded SHA-256 digest of its content.
//! The client computes the digest; the server only checks its shape and
//! normalises it to lowercase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of hex characters in a SHA-256 digest.
pub const VIDEO_ID_LEN: usize = 64;

/// Error returned when a string is not a well-formed video identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("video id must be {VIDEO_ID_LEN} hexadecimal characters")]
pub struct InvalidVideoId;

/// Hex-encoded SHA-256 digest identifying a video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate and normalise a candidate identifier.
    pub fn parse(raw: &str) -> Result<Self, InvalidVideoId> {
        if raw.len() != VIDEO_ID_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidVideoId);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Borrow the lowercase hex representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VideoId {
    type Err = InvalidVideoId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = InvalidVideoId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> String {
        id.0
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Postgres> for VideoId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for VideoId {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0.as_str(), buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for VideoId {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <String as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_accepts_sha256_hex() {
        let id = VideoId::parse(HELLO_SHA256).unwrap();
        assert_eq!(id.as_str(), HELLO_SHA256);
    }

    #[test]
    fn test_normalises_to_lowercase() {
        let id = VideoId::parse(&HELLO_SHA256.to_uppercase()).unwrap();
        assert_eq!(id.as_str(), HELLO_SHA256);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(VideoId::parse("abc"), Err(InvalidVideoId));
        assert_eq!(VideoId::parse(&format!("{HELLO_SHA256}0")), Err(InvalidVideoId));
    }

    #[test]
    fn test_rejects_non_hex() {
        let bad = format!("{}zz", &HELLO_SHA256[..62]);
        assert_eq!(VideoId::parse(&bad), Err(InvalidVideoId));
    }

    #[test]
    fn test_deserialization_validates() {
        let ok: Result<VideoId, _> = serde_json::from_str(&format!("\"{HELLO_SHA256}\""));
        assert!(ok.is_ok());
        let bad: Result<VideoId, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
