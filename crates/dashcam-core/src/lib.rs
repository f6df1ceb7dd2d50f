//! # dashcam-core
//!
//! Core crate for the dashcam video backend. Contains configuration schemas,
//! typed identifiers, the stable error-code table and the unified error type.
//!
//! This crate has **no** internal dependencies on other dashcam crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorCode, ErrorKind, FieldError, FieldErrors};
pub use result::AppResult;
