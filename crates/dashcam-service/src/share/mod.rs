//! Share links: unguessable public URLs for committed videos.

pub mod link;
pub mod service;

pub use link::LinkService;
pub use service::ShareService;
