//! Core type definitions used across the dashcam workspace.

pub mod id;
pub mod share_id;
pub mod video_id;

pub use id::*;
pub use share_id::ShareId;
pub use video_id::VideoId;
