//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator traits declared in
//! `otp_core`:
//! - **Cache**: Redis-backed and in-process `CacheStore` implementations
//! - **SMS**: Twilio-compatible HTTP gateway and a console transport for
//!   development
//!
//! `create_cache_store` and `create_transport` pick an implementation from
//! the startup configuration.

use otp_core::errors::CacheError;

/// Cache module - pending code storage backends
pub mod cache;

/// SMS module - message transports
pub mod sms;

pub use cache::{create_cache_store, InMemoryCacheStore, RedisCacheStore, RedisClient};
pub use sms::{create_transport, ConsoleTransport, TwilioTransport};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP client error for the SMS gateway
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for CacheError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e)
                if e.is_io_error()
                    || e.is_connection_refusal()
                    || e.is_connection_dropped()
                    || e.is_timeout() =>
            {
                CacheError::Unavailable(e.to_string())
            }
            other => CacheError::Operation(other.to_string()),
        }
    }
}
