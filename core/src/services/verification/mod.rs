//! Verification service module for SMS-based phone verification
//!
//! This module provides the complete verification code workflow:
//! - Secure code generation
//! - Dispatch through a pluggable message transport
//! - Pending code storage in a pluggable cache store
//! - Single-use, timing-safe code verification

mod code_generator;
mod config;
#[cfg(any(test, feature = "mock-services"))]
pub mod mock;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use code_generator::{format_code_pair, CodeGenerator, SecureCodeGenerator, PAIRED_DRAW_BOUND};
pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::{CacheStore, MessageTransport};
pub use types::{DispatchedCode, SendCodeResult};
pub use otp_shared::config::CodeStrategy;
