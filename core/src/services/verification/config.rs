//! Configuration for the verification service

use std::time::Duration;

use otp_shared::config::sms::CODE_PLACEHOLDER;
use otp_shared::config::{CodeStrategy, SmsConfig, VerificationConfig};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Lifetime handed to the cache store with each pending code
    pub code_ttl: Option<Duration>,
    /// How codes are drawn
    pub code_strategy: CodeStrategy,
    /// Outbound message body, `{code}` is substituted
    pub message_template: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from_configs(&VerificationConfig::default(), &SmsConfig::default())
    }
}

impl VerificationServiceConfig {
    /// Assemble from the startup configuration sections
    pub fn from_configs(verification: &VerificationConfig, sms: &SmsConfig) -> Self {
        Self {
            code_ttl: verification.code_ttl(),
            code_strategy: verification.code_strategy,
            message_template: sms.message_template.clone(),
        }
    }

    /// Render the outbound message for a code
    pub fn render_message(&self, code: &str) -> String {
        self.message_template.replace(CODE_PLACEHOLDER, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_message() {
        let config = VerificationServiceConfig::default();
        assert_eq!(config.render_message("003007"), "Your verification code: 003007");
    }

    #[test]
    fn test_default_ttl() {
        let config = VerificationServiceConfig::default();
        assert_eq!(config.code_ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.code_strategy, CodeStrategy::PairedDraw);
    }
}
