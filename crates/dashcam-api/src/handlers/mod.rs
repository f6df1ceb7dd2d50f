//! Route handlers, one module per resource.

pub mod account;
pub mod content;
pub mod health;
pub mod oauth;
pub mod share;
pub mod video;
