//! Domain entities representing core business objects.

pub mod pending_code;
pub mod verification_request;
pub mod verification_result;

// Re-export commonly used types
pub use pending_code::{is_well_formed_code, PendingCode, CODE_LENGTH};
pub use verification_request::VerificationRequest;
pub use verification_result::VerificationResult;
