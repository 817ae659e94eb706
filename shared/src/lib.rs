//! Shared utilities and common types for the phone verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types, loaded once at startup from the environment
//! - Error response structures
//! - Utility functions (phone validation and masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheBackend, CacheConfig, CodeStrategy, ConfigError, Environment,
    LogFormat, LoggingConfig, ServerConfig, SmsConfig, SmsProvider, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{HealthResponse, HealthStatus};
pub use utils::phone;
