//! Redis cache client implementation
//!
//! Thin wrapper over a multiplexed connection with connect and command
//! retries. Keys are used verbatim; prefixing is the caller's concern.

use once_cell::sync::Lazy;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use otp_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Deletes KEYS[1] only while it still holds ARGV[1]; returns 1 when deleted
static COMPARE_AND_DELETE: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#,
    )
});

/// Upper bound for the exponential backoff between retries
const MAX_BACKOFF_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Whether a command may be sent again after a failed attempt
///
/// A transport error can arrive after the server already ran the command, so
/// only commands whose second run leaves the same outcome are replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    /// Running the command twice is indistinguishable from running it once
    Safe,
    /// A second run may observe the first run's effect; send once
    Never,
}

/// Redis cache client with retry logic
///
/// Cloning is cheap; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Maximum number of attempts for an operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect to the Redis server named by `config.url`
    ///
    /// # Example
    /// ```no_run
    /// use otp_infra::cache::RedisClient;
    /// use otp_shared::config::CacheConfig;
    ///
    /// async fn connect() -> Result<RedisClient, otp_infra::InfrastructureError> {
    ///     RedisClient::new(&CacheConfig::redis("redis://localhost:6379")).await
    /// }
    /// ```
    pub async fn new(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let max_retries = config.max_retries.max(1);
        info!(
            url = %mask_url(&config.url),
            max_retries,
            "Creating Redis client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, max_retries, config.retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Set a value, with a millisecond-precision expiry when `ttl` is given
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), InfrastructureError> {
        debug!(key, ttl_ms = ttl.map(|t| t.as_millis() as u64), "Setting key");

        self.execute_with_retry(Replay::Safe, |mut conn| {
            let key = key.to_string();
            let value = value.to_string();

            Box::pin(async move {
                match ttl {
                    Some(ttl) => {
                        // PX 0 is rejected by Redis; round sub-millisecond ttls up
                        let millis = (ttl.as_millis() as u64).max(1);
                        redis::cmd("SET")
                            .arg(&key)
                            .arg(&value)
                            .arg("PX")
                            .arg(millis)
                            .query_async::<_, ()>(&mut conn)
                            .await
                    }
                    None => conn.set::<_, _, ()>(key, value).await,
                }
            })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a value; `None` when the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        self.execute_with_retry(Replay::Safe, |mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key; returns whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        let deleted = self
            .execute_with_retry(Replay::Safe, |mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to delete key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted > 0)
    }

    /// Check whether a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        self.execute_with_retry(Replay::Safe, |mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Delete `key` only if it currently holds `expected`, in one server-side step
    ///
    /// Sent at most once. A replay after a lost reply would find the key gone
    /// and report `false` for a value that did match, so a transport error is
    /// returned to the caller instead.
    pub async fn delete_if_equals(
        &self,
        key: &str,
        expected: &str,
    ) -> Result<bool, InfrastructureError> {
        debug!("Compare-and-delete on key '{}'", key);

        let deleted = self
            .execute_with_retry(Replay::Never, |mut conn| {
                let key = key.to_string();
                let expected = expected.to_string();
                Box::pin(async move {
                    COMPARE_AND_DELETE
                        .key(key)
                        .arg(expected)
                        .invoke_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| {
                error!("Failed compare-and-delete on key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted > 0)
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let result = self
            .execute_with_retry(Replay::Safe, |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => Ok(true),
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    async fn execute_with_retry<F, T>(&self, replay: Replay, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if should_retry(&e, replay, attempts, self.max_retries) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_BACKOFF_MS);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn should_retry(error: &RedisError, replay: Replay, attempts: u32, max_retries: u32) -> bool {
    replay == Replay::Safe && attempts < max_retries && is_retriable_error(error)
}

fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
