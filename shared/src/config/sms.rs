//! Message gateway configuration module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::{ConfigError, EnvSource};

/// Placeholder substituted with the generated code in `message_template`
pub const CODE_PLACEHOLDER: &str = "{code}";

/// SMS provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Twilio-compatible HTTP gateway
    Twilio,
    /// Writes messages to the log instead of sending them
    Console,
}

impl FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twilio" => Ok(SmsProvider::Twilio),
            "console" | "mock" => Ok(SmsProvider::Console),
            _ => Err(format!("Invalid SMS provider: {}", s)),
        }
    }
}

/// SMS gateway configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Provider used to deliver codes
    pub provider: SmsProvider,

    /// Gateway endpoint messages are POSTed to
    pub gateway_url: String,

    /// Account identifier, used as the basic-auth user
    pub account: String,

    /// Account secret, used as the basic-auth password
    pub auth_token: String,

    /// Sender phone number
    pub from_number: String,

    /// Timeout for a single gateway request in seconds
    pub request_timeout_secs: u64,

    /// Message body; `{code}` is replaced with the generated code
    pub message_template: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Console,
            gateway_url: String::new(),
            account: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            request_timeout_secs: 10,
            message_template: format!("Your verification code: {}", CODE_PLACEHOLDER),
        }
    }
}

impl fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsConfig")
            .field("provider", &self.provider)
            .field("gateway_url", &self.gateway_url)
            .field("account", &self.account)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("message_template", &self.message_template)
            .finish()
    }
}

impl SmsConfig {
    pub(crate) fn from_source(source: &EnvSource<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            provider: source.parse_or("SMS_PROVIDER", defaults.provider)?,
            gateway_url: source.string_or("TWILIO_URL", &defaults.gateway_url),
            account: source.string_or("TWILIO_ACCOUNT", &defaults.account),
            auth_token: source.string_or("TWILIO_AUTH_TOKEN", &defaults.auth_token),
            from_number: source.string_or("TWILIO_FROM_PHONE_NUMBER", &defaults.from_number),
            request_timeout_secs: source
                .parse_or("SMS_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            message_template: source.string_or("SMS_MESSAGE_TEMPLATE", &defaults.message_template),
        })
    }

    /// Check that the selected provider has everything it needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.message_template.contains(CODE_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "SMS_MESSAGE_TEMPLATE must contain {}",
                CODE_PLACEHOLDER
            )));
        }

        if self.provider == SmsProvider::Twilio {
            let required = [
                ("TWILIO_URL", &self.gateway_url),
                ("TWILIO_ACCOUNT", &self.account),
                ("TWILIO_AUTH_TOKEN", &self.auth_token),
                ("TWILIO_FROM_PHONE_NUMBER", &self.from_number),
            ];
            if let Some((key, _)) = required.iter().find(|(_, value)| value.is_empty()) {
                return Err(ConfigError::Missing {
                    key: key.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Gateway request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
