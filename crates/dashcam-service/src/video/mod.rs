//! Video metadata registration and the chunked upload engine.

pub mod service;
pub mod upload;

pub use service::{RegisterVideoRequest, VideoService};
pub use upload::{Offset, UploadOutcome, UploadService};
