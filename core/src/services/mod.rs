//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    CacheStore, CodeGenerator, DispatchedCode, MessageTransport, SecureCodeGenerator,
    SendCodeResult,
    VerificationService, VerificationServiceConfig,
};
