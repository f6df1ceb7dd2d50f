//! Request context carrying the authenticated account.

use chrono::{DateTime, Utc};

use dashcam_auth::Identity;
use dashcam_core::types::AccountId;

/// Context for the current authenticated request.
///
/// Built by the HTTP layer after authentication and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated account.
    pub account_id: AccountId,
    /// Best-effort client address.
    pub client_ip: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(account_id: AccountId, client_ip: Option<String>) -> Self {
        Self {
            account_id,
            client_ip,
            request_time: Utc::now(),
        }
    }

    /// Context for an authenticated identity.
    pub fn from_identity(identity: &Identity, client_ip: Option<String>) -> Self {
        Self::new(identity.account_id, client_ip)
    }
}
