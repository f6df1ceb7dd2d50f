//! # dashcam-service
//!
//! Business logic service layer for the dashcam backend. Each service
//! orchestrates the stores and the auth primitives to implement one group
//! of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod account;
pub mod context;
pub mod share;
pub mod video;

pub use account::AccountService;
pub use context::RequestContext;
pub use share::{LinkService, ShareService};
pub use video::{UploadService, VideoService};
