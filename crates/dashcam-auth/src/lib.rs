//! # dashcam-auth
//!
//! Credentials and token lifecycle for the dashcam backend.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and the password complexity policy
//! - `token`: opaque token generation and at-rest digests
//! - `authenticator`: bearer header parsing and per-request token validation
//! - `oauth`: the `password` / `refresh_token` grant state machine and logout

pub mod authenticator;
pub mod oauth;
pub mod password;
pub mod token;

pub use authenticator::{Authenticator, Identity};
pub use oauth::{GrantRequest, TokenGrant, TokenIssuer};
pub use password::{PasswordHasher, PasswordValidator};
pub use token::TokenGenerator;
