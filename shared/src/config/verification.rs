//! Verification code configuration module

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use super::{ConfigError, EnvSource};

/// How the 6-digit code is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStrategy {
    /// Two independent draws in `[0, 129)`, each zero-padded to 3 digits.
    /// Matches the code format and distribution of the legacy service.
    PairedDraw,
    /// One draw in `[0, 1_000_000)`, zero-padded to 6 digits
    FullRange,
}

impl CodeStrategy {
    /// Canonical name, as read from `OTP_CODE_STRATEGY` and written by serde
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeStrategy::PairedDraw => "paired_draw",
            CodeStrategy::FullRange => "full_range",
        }
    }
}

impl FromStr for CodeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "paired_draw" | "paired" | "legacy" => Ok(CodeStrategy::PairedDraw),
            "full_range" | "full" => Ok(CodeStrategy::FullRange),
            _ => Err(format!("Invalid code strategy: {}", s)),
        }
    }
}

/// Code issuance configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Lifetime of a pending code in seconds; 0 stores without expiry
    pub code_ttl_seconds: u64,

    /// Code generation strategy
    pub code_strategy: CodeStrategy,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 300,
            code_strategy: CodeStrategy::PairedDraw,
        }
    }
}

impl VerificationConfig {
    pub(crate) fn from_source(source: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            code_ttl_seconds: source.parse_or("OTP_CODE_TTL_SECS", defaults.code_ttl_seconds)?,
            code_strategy: source.parse_or("OTP_CODE_STRATEGY", defaults.code_strategy)?,
        })
    }

    /// Pending code lifetime, `None` when expiry is disabled
    pub fn code_ttl(&self) -> Option<Duration> {
        match self.code_ttl_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_agree() {
        for strategy in [CodeStrategy::PairedDraw, CodeStrategy::FullRange] {
            let name = strategy.as_str();
            assert_eq!(name.parse::<CodeStrategy>().unwrap(), strategy);
            assert_eq!(serde_json::to_string(&strategy).unwrap(), format!("\"{}\"", name));
            assert_eq!(
                serde_json::from_str::<CodeStrategy>(&format!("\"{}\"", name)).unwrap(),
                strategy
            );
        }
    }

    #[test]
    fn test_strategy_aliases() {
        assert_eq!("full-range".parse::<CodeStrategy>().unwrap(), CodeStrategy::FullRange);
        assert_eq!("FULL_RANGE".parse::<CodeStrategy>().unwrap(), CodeStrategy::FullRange);
        assert_eq!("paired".parse::<CodeStrategy>().unwrap(), CodeStrategy::PairedDraw);
        assert!("fullrange".parse::<CodeStrategy>().is_err());
    }
}
