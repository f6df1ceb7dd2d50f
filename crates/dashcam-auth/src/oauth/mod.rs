//! OAuth2-style token endpoint: grant validation, issuance and logout.

pub mod grant;
pub mod issuer;

pub use grant::{Grant, GrantRequest};
pub use issuer::{TokenGrant, TokenIssuer};
