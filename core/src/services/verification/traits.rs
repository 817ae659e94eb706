//! Collaborator contracts consumed by the verification service

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{CacheError, TransportError};

/// Key/value store holding pending codes
///
/// Expiry is the store's responsibility: a value written with a `ttl` must
/// read as absent once the ttl elapses.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Read the value under `key`; `Ok(None)` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Remove `key`; returns whether a value was removed
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Check whether a live value exists under `key`
    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Atomically remove `key` only if it currently holds `expected`
    ///
    /// Returns `true` when this call removed the value. Of several concurrent
    /// callers passing the same `expected`, at most one observes `true`.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, CacheError>;
}

/// Outbound text message delivery
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send `body` to the phone number `to`, returning the gateway message id
    async fn send(&self, to: &str, body: &str) -> Result<String, TransportError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}
