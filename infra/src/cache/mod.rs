//! Cache module for pending code storage
//!
//! Provides the Redis client, the Redis-backed `CacheStore` and an in-process
//! store for single-instance deployments.

pub mod memory_store;
pub mod redis_client;
pub mod redis_store;

use std::sync::Arc;

use otp_core::services::verification::CacheStore;
use otp_shared::config::{CacheBackend, CacheConfig};

use crate::InfrastructureError;

pub use memory_store::InMemoryCacheStore;
pub use redis_client::RedisClient;
pub use redis_store::RedisCacheStore;

/// Build the cache store selected by `config.backend`
///
/// The Redis backend connects eagerly, so an unreachable server fails
/// startup instead of the first request.
pub async fn create_cache_store(
    config: &CacheConfig,
) -> Result<Arc<dyn CacheStore>, InfrastructureError> {
    match config.backend {
        CacheBackend::Redis => {
            let store = RedisCacheStore::connect(config.clone()).await?;
            tracing::info!(
                url = %redis_client::mask_url(&config.url),
                key_prefix = %config.key_prefix,
                "Using Redis cache store"
            );
            Ok(Arc::new(store))
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-memory cache store; pending codes are lost on restart");
            Ok(Arc::new(InMemoryCacheStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend() {
        let store = create_cache_store(&CacheConfig::default()).await.unwrap();
        store.set("k", "v", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_invalid_redis_url_is_config_error() {
        let config = CacheConfig::redis("not a url");
        let err = create_cache_store(&config).await.err().unwrap();
        assert!(matches!(err, InfrastructureError::Config(_)));
    }
}
