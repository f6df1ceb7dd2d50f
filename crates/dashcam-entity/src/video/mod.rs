//! Video and chunk entities.

pub mod chunk;
pub mod model;

pub use chunk::{ChunkReceipt, FinalizeOutcome};
pub use model::{NewVideo, UploadState, Video};
