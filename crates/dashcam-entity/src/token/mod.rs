//! Bearer and refresh token entities.

pub mod model;

pub use model::{NewToken, Token, TokenKind};
