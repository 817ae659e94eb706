//! `CacheStore` backed by Redis

use async_trait::async_trait;
use std::time::Duration;

use otp_core::errors::CacheError;
use otp_core::services::verification::CacheStore;
use otp_shared::config::CacheConfig;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Pending code store shared by every service instance pointing at the same Redis
///
/// Expiry is delegated to Redis key TTLs. Every key is namespaced with the
/// configured prefix.
#[derive(Clone)]
pub struct RedisCacheStore {
    client: RedisClient,
    config: CacheConfig,
}

impl RedisCacheStore {
    pub fn new(client: RedisClient, config: CacheConfig) -> Self {
        Self { client, config }
    }

    /// Connect using `config.url`
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(&config).await?;
        Ok(Self::new(client, config))
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let key = self.config.make_key(key);
        Ok(self.client.set(&key, value, ttl).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let key = self.config.make_key(key);
        Ok(self.client.get(&key).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let key = self.config.make_key(key);
        Ok(self.client.delete(&key).await?)
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let key = self.config.make_key(key);
        Ok(self.client.exists(&key).await?)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let key = self.config.make_key(key);
        Ok(self.client.delete_if_equals(&key, expected).await?)
    }
}
