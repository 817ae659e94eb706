//! Types for verification service results

use chrono::{DateTime, Utc};

use crate::domain::entities::PendingCode;

/// Result of sending a verification code
///
/// The code itself is deliberately absent; it only travels to the phone.
#[derive(Debug, Clone)]
pub struct SendCodeResult {
    /// Phone number the code was sent to
    pub phone_number: String,
    /// The message ID from the gateway
    pub message_id: String,
    /// When the pending code was created
    pub created_at: DateTime<Utc>,
    /// When the store will drop the pending code, if it expires
    pub expires_at: Option<DateTime<Utc>>,
}

/// A code the transport accepted that is not yet stored
///
/// Produced by `VerificationService::dispatch_code` and consumed by
/// `VerificationService::store_code`. Dropping it without storing leaves the
/// recipient holding a code that will never verify.
pub struct DispatchedCode {
    pub(crate) pending: PendingCode,
    pub(crate) message_id: String,
}

impl DispatchedCode {
    /// Phone number the code was sent to
    pub fn phone_number(&self) -> &str {
        &self.pending.phone_number
    }

    /// The message ID from the gateway
    pub fn message_id(&self) -> &str {
        &self.message_id
    }
}
