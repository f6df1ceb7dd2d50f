//! # dashcam-database
//!
//! Persistence for the dashcam backend. Services talk to the async store
//! traits in [`store`]; two providers implement them:
//!
//! - **postgres**: sqlx repositories in [`repositories`]
//! - **memory**: a single-process store in [`memory`], used for local
//!   development and tests
//!
//! The provider is selected at runtime from configuration by [`Stores`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use provider::Stores;
pub use store::{AccountStore, ContentLookup, ShareStore, TokenStore, VideoStore};
