//! Mapping of domain failures onto HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

use otp_core::errors::{StorageStage, TransportError, VerificationError};
use otp_shared::errors::{error_codes, ErrorResponse};

/// Errors returned by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body failed field validation
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationErrors),

    /// The request body could not be parsed
    #[error("Malformed request body: {0}")]
    BadRequest(String),

    /// The verification service failed
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The request did not finish within the server request timeout
    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    /// Stable error code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => error_codes::VALIDATION_ERROR,
            ApiError::BadRequest(_) => error_codes::BAD_REQUEST,
            ApiError::Timeout => error_codes::REQUEST_TIMEOUT,
            ApiError::Verification(err) => match err {
                VerificationError::RandomSource(_) => error_codes::RANDOM_SOURCE_UNAVAILABLE,
                VerificationError::Transport(TransportError::Unreachable { .. }) => {
                    error_codes::SMS_GATEWAY_UNAVAILABLE
                }
                VerificationError::Transport(TransportError::Rejected { .. }) => {
                    error_codes::SMS_GATEWAY_REJECTED
                }
                VerificationError::Transport(TransportError::InvalidRecipient(_))
                | VerificationError::InvalidPhoneNumber { .. } => error_codes::PHONE_INVALID,
                VerificationError::Storage {
                    stage: StorageStage::PersistAfterSend,
                    ..
                } => error_codes::CODE_NOT_STORED,
                VerificationError::Storage { .. } => error_codes::CACHE_UNAVAILABLE,
            },
        }
    }

    /// Client-facing message; infrastructure details stay in the logs
    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Invalid request data".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Timeout => "The request took too long to complete".to_string(),
            ApiError::Verification(err) => match err {
                VerificationError::RandomSource(_) => {
                    "Unable to generate a verification code".to_string()
                }
                VerificationError::Transport(TransportError::InvalidRecipient(_))
                | VerificationError::InvalidPhoneNumber { .. } => {
                    "Invalid phone number".to_string()
                }
                VerificationError::Transport(_) => {
                    "Unable to deliver the verification code".to_string()
                }
                VerificationError::Storage {
                    stage: StorageStage::PersistAfterSend,
                    ..
                } => "The verification code was sent but could not be saved; request a new code"
                    .to_string(),
                VerificationError::Storage { .. } => {
                    "Verification storage is temporarily unavailable".to_string()
                }
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Verification(err) => match err {
                VerificationError::RandomSource(_) => StatusCode::INTERNAL_SERVER_ERROR,
                VerificationError::Transport(TransportError::Unreachable { .. }) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                VerificationError::Transport(TransportError::Rejected { .. }) => {
                    StatusCode::BAD_GATEWAY
                }
                VerificationError::Transport(TransportError::InvalidRecipient(_))
                | VerificationError::InvalidPhoneNumber { .. } => StatusCode::BAD_REQUEST,
                VerificationError::Storage {
                    stage: StorageStage::PersistAfterSend,
                    ..
                } => StatusCode::INTERNAL_SERVER_ERROR,
                VerificationError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "Request rejected");
        }

        let mut body = ErrorResponse::new(self.code(), self.public_message());
        if let ApiError::Validation(errors) = self {
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                body = body.add_detail(field, messages);
            }
        }

        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otp_core::errors::CacheError;

    fn storage(stage: StorageStage) -> ApiError {
        ApiError::Verification(VerificationError::Storage {
            stage,
            source: CacheError::Unavailable("down".to_string()),
        })
    }

    #[test]
    fn test_transport_mapping() {
        let unreachable = ApiError::from(VerificationError::Transport(TransportError::Unreachable {
            provider: "Twilio".to_string(),
            message: "timeout".to_string(),
        }));
        assert_eq!(unreachable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(unreachable.code(), "SMS_GATEWAY_UNAVAILABLE");

        let rejected = ApiError::from(VerificationError::Transport(TransportError::Rejected {
            provider: "Twilio".to_string(),
            status: 400,
            message: "bad To".to_string(),
        }));
        assert_eq!(rejected.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(rejected.code(), "SMS_GATEWAY_REJECTED");
    }

    #[test]
    fn test_storage_mapping_distinguishes_stage() {
        let after_send = storage(StorageStage::PersistAfterSend);
        assert_eq!(after_send.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(after_send.code(), "CODE_NOT_STORED");

        for stage in [StorageStage::Read, StorageStage::Consume] {
            let err = storage(stage);
            assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(err.code(), "CACHE_UNAVAILABLE");
        }
    }

    #[test]
    fn test_invalid_phone_is_bad_request() {
        let err = ApiError::from(VerificationError::InvalidPhoneNumber {
            phone: "***".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "PHONE_INVALID");
    }

    #[test]
    fn test_public_message_hides_cache_details() {
        let err = storage(StorageStage::Read);
        assert!(!err.public_message().contains("down"));
    }
}
