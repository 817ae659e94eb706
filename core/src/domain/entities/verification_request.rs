//! Subject of a "send code" call; never persisted.

use serde::{Deserialize, Serialize};

/// Phone number an inbound send request asks a code for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Phone number the code is bound to
    pub phone_number: String,
}

impl VerificationRequest {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
        }
    }
}
