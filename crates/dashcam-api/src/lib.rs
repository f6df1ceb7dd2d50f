//! # dashcam-api
//!
//! HTTP API layer for the dashcam backend built on Axum.
//!
//! Provides the REST endpoints, middleware (CORS, request logging),
//! extractors (bearer auth, client address, lenient bodies), DTOs, and the
//! mapping from [`AppError`](dashcam_core::AppError) to the JSON error
//! envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
