//! Domain-specific error types and error handling.
//!
//! Not finding a pending code is never an error: it is reported as an
//! unmatched `VerificationResult`.

use thiserror::Error;

/// Errors reported by a `CacheStore` implementation
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backend could not be reached
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    /// The backend was reached but rejected or failed the command
    #[error("Cache operation failed: {0}")]
    Operation(String),

    /// A stored value could not be decoded
    #[error("Corrupt cache entry for key {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Errors reported by a `MessageTransport` implementation
#[derive(Error, Debug)]
pub enum TransportError {
    /// The call to the gateway did not complete (network, TLS, timeout)
    #[error("{provider} gateway unreachable: {message}")]
    Unreachable { provider: String, message: String },

    /// The gateway answered with a non-success status
    #[error("{provider} gateway rejected the message with status {status}: {message}")]
    Rejected {
        provider: String,
        status: u16,
        message: String,
    },

    /// The recipient cannot be addressed by this transport
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// Which storage interaction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStage {
    /// Writing the pending code after the message was already delivered.
    /// The user holds a code that can never be verified.
    PersistAfterSend,
    /// Reading the pending code during verification
    Read,
    /// Removing a matched code during verification
    Consume,
}

impl std::fmt::Display for StorageStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageStage::PersistAfterSend => write!(f, "persist after send"),
            StorageStage::Read => write!(f, "read"),
            StorageStage::Consume => write!(f, "consume"),
        }
    }
}

/// Errors returned by the verification service
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Secure entropy was unavailable while generating a code
    #[error("Secure random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),

    /// The message gateway could not deliver the code
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The cache store failed
    #[error("Storage error during {stage}: {source}")]
    Storage {
        stage: StorageStage,
        #[source]
        source: CacheError,
    },

    /// The phone number is not a valid verification subject
    #[error("Invalid phone number format: {phone}")]
    InvalidPhoneNumber { phone: String },
}

impl VerificationError {
    pub(crate) fn storage(stage: StorageStage, source: CacheError) -> Self {
        VerificationError::Storage { stage, source }
    }

    /// True when a code reached the user but was not stored
    pub fn is_sent_but_not_stored(&self) -> bool {
        matches!(
            self,
            VerificationError::Storage {
                stage: StorageStage::PersistAfterSend,
                ..
            }
        )
    }
}

pub type DomainResult<T> = Result<T, VerificationError>;
