//! Route handlers and the state they share

pub mod health;
pub mod phone;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use otp_core::errors::{CacheError, StorageStage, VerificationError};
use otp_core::services::verification::{
    CacheStore, DispatchedCode, MessageTransport, SendCodeResult, VerificationService,
    VerificationServiceConfig,
};

use crate::errors::ApiError;

/// Verification service over boxed collaborators, as wired by `main`
pub type DynVerificationService = VerificationService<dyn MessageTransport, dyn CacheStore>;

/// Application state that holds shared services
pub struct AppState {
    pub verification: Arc<DynVerificationService>,
    /// Store behind `verification`, probed by the health check
    pub cache: Arc<dyn CacheStore>,
    /// Upper bound on one verification call
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        cache: Arc<dyn CacheStore>,
        verification: VerificationServiceConfig,
        request_timeout: Duration,
    ) -> Self {
        Self {
            verification: Arc::new(VerificationService::new(transport, cache.clone(), verification)),
            cache,
            request_timeout,
        }
    }

    /// Deadline for a request starting now
    pub(crate) fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }

    /// Run a service call under the request timeout
    pub(crate) async fn bounded<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, VerificationError>>,
    {
        self.bounded_until(self.deadline(), call).await
    }

    /// Run a service call that must finish by `deadline`
    pub(crate) async fn bounded_until<T, F>(&self, deadline: Instant, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, VerificationError>>,
    {
        match timeout_at(deadline, call).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.request_timeout.as_secs(),
                    "Verification call exceeded request timeout"
                );
                Err(ApiError::Timeout)
            }
        }
    }

    /// Store a dispatched code by `deadline`
    ///
    /// The code has already reached the phone, so running out of time here
    /// is reported as a code that was sent but not stored rather than as a
    /// plain timeout.
    pub(crate) async fn store_until(
        &self,
        deadline: Instant,
        dispatched: DispatchedCode,
    ) -> Result<SendCodeResult, ApiError> {
        let message_id = dispatched.message_id().to_string();
        match timeout_at(deadline, self.verification.store_code(dispatched)).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => {
                tracing::error!(
                    message_id = %message_id,
                    timeout_secs = self.request_timeout.as_secs(),
                    event = "code_sent_not_stored",
                    "Storing a delivered verification code exceeded request timeout"
                );
                Err(ApiError::Verification(VerificationError::Storage {
                    stage: StorageStage::PersistAfterSend,
                    source: CacheError::Unavailable("timed out storing pending code".to_string()),
                }))
            }
        }
    }
}
