//! Custom Axum extractors.

pub mod auth;
pub mod body;
pub mod client_ip;
pub mod query;

pub use auth::AuthUser;
pub use body::{FormOrJson, JsonBody};
pub use client_ip::ClientIp;
pub use query::QueryParams;
