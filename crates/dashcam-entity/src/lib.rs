//! # dashcam-entity
//!
//! Domain entity models for the dashcam backend. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! derive `sqlx::FromRow`; input types (`New*`, `*Changes`) are plain
//! structs handed to the store.

pub mod account;
pub mod share;
pub mod token;
pub mod video;
