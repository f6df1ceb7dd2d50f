//! Request DTOs.

use serde::Deserialize;

/// Body of `DELETE /oauth/token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevokeRequest {
    /// Refresh token to deactivate alongside the access token.
    pub refresh_token: Option<String>,
}

/// Query of `PUT /Account/Videos/{id}/content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentQuery {
    /// Chunk number, or `-1` to finalize. Kept raw so parsing errors are
    /// reported in the envelope.
    pub offset: Option<String>,
}

/// Body of `POST /Share`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateShareRequest {
    /// Hex id of the video to share.
    pub id: Option<String>,
}
