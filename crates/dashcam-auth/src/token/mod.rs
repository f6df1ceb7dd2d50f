//! Opaque token generation.

pub mod generator;

pub use generator::{TokenGenerator, hash_token};
