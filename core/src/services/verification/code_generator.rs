//! Verification code generation
//!
//! Codes are drawn from the operating system CSPRNG through the fallible
//! `try_fill_bytes` path, so an entropy failure is reported instead of being
//! papered over with a weaker generator.

use rand::rngs::OsRng;
use rand::RngCore;

use otp_shared::config::CodeStrategy;

/// Exclusive upper bound of each half in the paired-draw strategy
pub const PAIRED_DRAW_BOUND: u32 = 129;

const FULL_RANGE_BOUND: u32 = 1_000_000;

/// Produces fixed-format numeric verification codes
pub trait CodeGenerator: Send + Sync {
    /// Generate a 6-character numeric code
    fn generate(&self) -> Result<String, rand::Error>;
}

/// `CodeGenerator` backed by `OsRng`
#[derive(Debug, Clone, Copy)]
pub struct SecureCodeGenerator {
    strategy: CodeStrategy,
}

impl SecureCodeGenerator {
    pub fn new(strategy: CodeStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> CodeStrategy {
        self.strategy
    }

    /// Generate a code from an arbitrary random source
    pub fn generate_with<R: RngCore + ?Sized>(
        strategy: CodeStrategy,
        rng: &mut R,
    ) -> Result<String, rand::Error> {
        match strategy {
            CodeStrategy::PairedDraw => {
                let first = draw_below(rng, PAIRED_DRAW_BOUND)?;
                let second = draw_below(rng, PAIRED_DRAW_BOUND)?;
                Ok(format_code_pair(first, second))
            }
            CodeStrategy::FullRange => {
                let value = draw_below(rng, FULL_RANGE_BOUND)?;
                Ok(format!("{:06}", value))
            }
        }
    }
}

impl Default for SecureCodeGenerator {
    fn default() -> Self {
        Self::new(CodeStrategy::PairedDraw)
    }
}

impl CodeGenerator for SecureCodeGenerator {
    fn generate(&self) -> Result<String, rand::Error> {
        Self::generate_with(self.strategy, &mut OsRng)
    }
}

/// Concatenate two draws as zero-padded 3-digit groups: `(3, 7)` -> `"003007"`
pub fn format_code_pair(first: u32, second: u32) -> String {
    format!("{:03}{:03}", first, second)
}

/// Uniform draw in `[0, bound)` by rejection sampling
fn draw_below<R: RngCore + ?Sized>(rng: &mut R, bound: u32) -> Result<u32, rand::Error> {
    debug_assert!(bound > 0);
    // Largest multiple of `bound` that fits; values at or above it would bias the modulo
    let zone = (u32::MAX / bound) * bound;
    let mut buf = [0u8; 4];
    loop {
        rng.try_fill_bytes(&mut buf)?;
        let value = u32::from_le_bytes(buf);
        if value < zone {
            return Ok(value % bound);
        }
    }
}
