//! Pending code entity for SMS-based verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CacheError;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// An issued, not yet verified code
///
/// At most one exists per phone number; a new send replaces the previous
/// one. Lives only in the cache store, encoded as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCode {
    /// Phone number this code was sent to
    pub phone_number: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,
}

impl PendingCode {
    /// Creates a pending code stamped with the current time
    pub fn new(phone_number: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            code: code.into(),
            created_at: Utc::now(),
        }
    }

    /// Serializes the entry for the cache store
    pub fn encode(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(|e| CacheError::Corrupt {
            key: self.phone_number.clone(),
            reason: e.to_string(),
        })
    }

    /// Parses an entry read from the cache store under `key`
    pub fn decode(key: &str, raw: &str) -> Result<Self, CacheError> {
        serde_json::from_str(raw).map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// True for exactly `CODE_LENGTH` ASCII digits
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
