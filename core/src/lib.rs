//! # Phone Verification Core
//!
//! Core business logic for issuing and validating one-time passcodes bound
//! to a phone number. This crate contains the domain entities, the error
//! types, the collaborator traits (`CacheStore`, `MessageTransport`) and the
//! `VerificationService` that orchestrates them.
//!
//! ## Features
//!
//! - `mock-services`: Enable the in-process test doubles in
//!   `services::verification::mock`

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
