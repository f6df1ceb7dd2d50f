//! Random bearer/refresh token values and their at-rest digest.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Produces hex-encoded tokens from the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    bytes: usize,
}

impl TokenGenerator {
    /// Generator emitting `bytes` random bytes per token.
    pub fn new(bytes: usize) -> Self {
        Self { bytes }
    }

    /// A fresh token; `2 * bytes` lowercase hex characters.
    pub fn generate(&self) -> String {
        let mut buf = vec![0u8; self.bytes];
        rand::rng().fill_bytes(&mut buf);
        hex::encode(buf)
    }
}

/// SHA-256 digest (hex) under which a token is persisted and looked up.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
