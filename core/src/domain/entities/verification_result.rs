//! Outcome of a verify call; never persisted.

use serde::{Deserialize, Serialize};

/// Outcome of a verify call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the supplied code matched a pending code
    pub matched: bool,
}

impl VerificationResult {
    pub fn matched() -> Self {
        Self { matched: true }
    }

    pub fn unmatched() -> Self {
        Self { matched: false }
    }
}
