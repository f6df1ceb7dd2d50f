//! Share link id generation.

use rand::RngCore;

use dashcam_core::types::ShareId;
use dashcam_core::types::share_id::SHARE_ID_BYTES;

/// Generates random share ids.
#[derive(Debug, Clone, Default)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// A fresh id from the OS-seeded CSPRNG.
    pub fn generate(&self) -> ShareId {
        let mut bytes = vec![0u8; SHARE_ID_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        ShareId::from_bytes(bytes)
    }
}
