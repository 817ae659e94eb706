//! Cache configuration module

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{ConfigError, EnvSource};

/// Which store backs pending codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Redis, shared between server instances
    Redis,
    /// Process-local map, for development and tests
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" | "in-memory" => Ok(CacheBackend::Memory),
            _ => Err(format!("Invalid cache backend: {}", s)),
        }
    }
}

/// Pending code storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Storage backend
    pub backend: CacheBackend,

    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every pending code key
    pub key_prefix: String,

    /// Maximum attempts for the startup connection and for each command
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            url: String::from("redis://localhost:6379"),
            key_prefix: String::from("otp:pending"),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create a Redis-backed configuration with URL
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: CacheBackend::Redis,
            url: url.into(),
            ..Default::default()
        }
    }

    pub(crate) fn from_source(source: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            backend: source.parse_or("CACHE_BACKEND", defaults.backend)?,
            url: source.string_or("REDIS_URL", &defaults.url),
            key_prefix: source.string_or("CACHE_KEY_PREFIX", &defaults.key_prefix),
            max_retries: source.parse_or("REDIS_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: source.parse_or("REDIS_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
        })
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}
