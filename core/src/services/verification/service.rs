//! Main verification service implementation

use chrono::Duration as ChronoDuration;
use constant_time_eq::constant_time_eq;
use std::sync::Arc;

use otp_shared::utils::phone::{is_valid_phone, mask_phone};

use crate::domain::entities::{is_well_formed_code, PendingCode, VerificationResult};
use crate::errors::{DomainResult, StorageStage, VerificationError};

use super::code_generator::{CodeGenerator, SecureCodeGenerator};
use super::config::VerificationServiceConfig;
use super::traits::{CacheStore, MessageTransport};
use super::types::{DispatchedCode, SendCodeResult};

/// Verification service for issuing and checking SMS verification codes
///
/// Holds no per-phone state: every pending code lives in the cache store,
/// so any number of service instances may share one store.
pub struct VerificationService<T: MessageTransport + ?Sized, C: CacheStore + ?Sized> {
    /// Transport used to deliver codes
    transport: Arc<T>,
    /// Store holding pending codes, keyed by phone number
    cache: Arc<C>,
    /// Source of new codes
    generator: Arc<dyn CodeGenerator>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<T: MessageTransport + ?Sized, C: CacheStore + ?Sized> VerificationService<T, C> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `transport` - Message transport implementation
    /// * `cache` - Cache store implementation
    /// * `config` - Service configuration
    pub fn new(transport: Arc<T>, cache: Arc<C>, config: VerificationServiceConfig) -> Self {
        let generator: Arc<dyn CodeGenerator> =
            Arc::new(SecureCodeGenerator::new(config.code_strategy));
        Self {
            transport,
            cache,
            generator,
            config,
        }
    }

    /// Replace the code generator
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Send a verification code to a phone number
    ///
    /// This method:
    /// 1. Generates a new verification code
    /// 2. Sends the code through the message transport
    /// 3. Stores the code in the cache, only once the send succeeded
    ///
    /// A transport failure leaves the store untouched. A store failure after
    /// a successful send is reported as `StorageStage::PersistAfterSend`.
    pub async fn send_code(&self, phone_number: &str) -> DomainResult<SendCodeResult> {
        let dispatched = self.dispatch_code(phone_number).await?;
        self.store_code(dispatched).await
    }

    /// Generate a code and hand it to the message transport
    ///
    /// Nothing is written to the store. Callers that bound the send with a
    /// deadline should bound this phase only and let `store_code` finish, or
    /// report an abandoned store as `StorageStage::PersistAfterSend`.
    pub async fn dispatch_code(&self, phone_number: &str) -> DomainResult<DispatchedCode> {
        if !is_valid_phone(phone_number) {
            return Err(VerificationError::InvalidPhoneNumber {
                phone: mask_phone(phone_number),
            });
        }
        let masked = mask_phone(phone_number);

        let code = self.generator.generate().map_err(|e| {
            tracing::error!(phone = %masked, error = %e, "Secure random source unavailable");
            VerificationError::RandomSource(e)
        })?;

        let message = self.config.render_message(&code);
        let message_id = self
            .transport
            .send(phone_number, &message)
            .await
            .map_err(|e| {
                tracing::warn!(
                    phone = %masked,
                    provider = self.transport.provider_name(),
                    error = %e,
                    "Failed to deliver verification code"
                );
                VerificationError::Transport(e)
            })?;

        Ok(DispatchedCode {
            pending: PendingCode::new(phone_number, code),
            message_id,
        })
    }

    /// Store a dispatched code as the pending code for its phone number
    pub async fn store_code(&self, dispatched: DispatchedCode) -> DomainResult<SendCodeResult> {
        let DispatchedCode {
            pending,
            message_id,
        } = dispatched;
        let masked = mask_phone(&pending.phone_number);

        let stored = match pending.encode() {
            Ok(raw) => {
                self.cache
                    .set(&pending.phone_number, &raw, self.config.code_ttl)
                    .await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            tracing::error!(
                phone = %masked,
                message_id = %message_id,
                error = %e,
                event = "code_sent_not_stored",
                "Verification code delivered but could not be stored"
            );
            return Err(VerificationError::storage(StorageStage::PersistAfterSend, e));
        }

        tracing::info!(
            phone = %masked,
            provider = self.transport.provider_name(),
            message_id = %message_id,
            event = "code_sent",
            "Verification code sent"
        );

        let expires_at = self
            .config
            .code_ttl
            .and_then(|ttl| ChronoDuration::from_std(ttl).ok())
            .map(|ttl| pending.created_at + ttl);

        Ok(SendCodeResult {
            phone_number: pending.phone_number,
            message_id,
            created_at: pending.created_at,
            expires_at,
        })
    }

    /// Verify a code against the pending code for a phone number
    ///
    /// Returns an unmatched result when nothing is pending (never sent,
    /// expired or already used) or the code differs; a wrong guess leaves the
    /// pending code in place. A match consumes the pending code, and only the
    /// caller whose consume succeeds is told it matched.
    pub async fn verify_code(&self, phone_number: &str, code: &str) -> DomainResult<VerificationResult> {
        let masked = mask_phone(phone_number);

        if !is_well_formed_code(code) {
            tracing::debug!(phone = %masked, "Malformed verification code rejected");
            return Ok(VerificationResult::unmatched());
        }

        let raw = match self.cache.get(phone_number).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(phone = %masked, "No pending verification code");
                return Ok(VerificationResult::unmatched());
            }
            Err(e) => {
                tracing::error!(phone = %masked, error = %e, "Failed to read pending code");
                return Err(VerificationError::storage(StorageStage::Read, e));
            }
        };

        let pending = PendingCode::decode(phone_number, &raw)
            .map_err(|e| VerificationError::storage(StorageStage::Read, e))?;

        if !constant_time_eq(pending.code.as_bytes(), code.as_bytes()) {
            tracing::info!(phone = %masked, event = "code_mismatch", "Verification code mismatch");
            return Ok(VerificationResult::unmatched());
        }

        let consumed = self
            .cache
            .delete_if_equals(phone_number, &raw)
            .await
            .map_err(|e| {
                tracing::error!(phone = %masked, error = %e, "Failed to consume pending code");
                VerificationError::storage(StorageStage::Consume, e)
            })?;

        if consumed {
            tracing::info!(phone = %masked, event = "code_verified", "Verification code matched");
            Ok(VerificationResult::matched())
        } else {
            // Another request consumed or replaced the code between read and delete
            tracing::info!(phone = %masked, event = "code_consume_lost", "Pending code already consumed");
            Ok(VerificationResult::unmatched())
        }
    }
}
