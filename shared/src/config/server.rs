//! Server configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ConfigError, EnvSource};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Upper bound for a single request, covering gateway and cache calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
            request_timeout: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub(crate) fn from_source(source: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: source.string_or("SERVER_HOST", &defaults.host),
            port: source.parse_or("SERVER_PORT", defaults.port)?,
            workers: source.parse_or("SERVER_WORKERS", defaults.workers)?,
            request_timeout: source.parse_or("SERVER_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn default_request_timeout() -> u64 {
    15
}
