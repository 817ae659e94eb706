//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Pending code storage backend (Redis or in-memory)
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding and request timeouts
//! - `sms` - Message gateway provider and credentials
//! - `verification` - Code lifetime and generation strategy
//!
//! Configuration is read once at startup and handed to the components that
//! need it. Nothing here is stored in process-wide mutable state.

pub mod cache;
pub mod environment;
pub mod server;
pub mod sms;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use cache::{CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use sms::{SmsConfig, SmsProvider};
pub use verification::{CodeStrategy, VerificationConfig};

/// Errors raised while building configuration from the environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required setting: {key}")]
    Missing { key: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Pending code storage configuration
    pub cache: CacheConfig,

    /// Message gateway configuration
    pub sms: SmsConfig,

    /// Code issuance configuration
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map-backed closure instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = EnvSource::new(&lookup);
        let environment = source.parse_or("ENVIRONMENT", Environment::Development)?;

        let config = Self {
            environment,
            server: ServerConfig::from_source(&source)?,
            cache: CacheConfig::from_source(&source)?,
            sms: SmsConfig::from_source(&source)?,
            verification: VerificationConfig::from_source(&source)?,
            logging: LoggingConfig::from_source(&source, environment)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Cross-section checks that a single sub-config cannot make on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.sms.provider == SmsProvider::Console {
            return Err(ConfigError::Invalid(
                "console SMS provider is not allowed in production".to_string(),
            ));
        }
        self.sms.validate()
    }
}

/// Typed access over a string key lookup
pub(crate) struct EnvSource<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> EnvSource<'a> {
    pub(crate) fn new(lookup: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self { lookup }
    }

    /// Raw value, with empty strings treated as unset
    pub(crate) fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    pub(crate) fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }
}
