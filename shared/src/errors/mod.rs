//! Shared error response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes returned by the verification endpoints
pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const PHONE_INVALID: &str = "PHONE_INVALID";
    pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
    pub const RANDOM_SOURCE_UNAVAILABLE: &str = "RANDOM_SOURCE_UNAVAILABLE";
    pub const SMS_GATEWAY_UNAVAILABLE: &str = "SMS_GATEWAY_UNAVAILABLE";
    pub const SMS_GATEWAY_REJECTED: &str = "SMS_GATEWAY_REJECTED";
    pub const CODE_NOT_STORED: &str = "CODE_NOT_STORED";
    pub const CACHE_UNAVAILABLE: &str = "CACHE_UNAVAILABLE";
}
