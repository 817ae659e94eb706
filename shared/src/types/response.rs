//! Health check response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn from_check(ok: bool) -> Self {
        if ok {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Service name
    pub service: String,

    /// Server version
    pub version: String,

    /// Pending code store reachability
    pub cache: HealthStatus,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Build a response; the overall status follows the cache status
    pub fn new(service: impl Into<String>, version: impl Into<String>, cache_ok: bool) -> Self {
        let cache = HealthStatus::from_check(cache_ok);
        Self {
            status: cache,
            service: service.into(),
            version: version.into(),
            cache,
            timestamp: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
