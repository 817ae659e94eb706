//! SMS transport module
//!
//! - **Twilio**: production delivery through a Twilio-compatible HTTP gateway
//! - **Console**: prints messages to stdout for development

pub mod console;
pub mod twilio;

use std::sync::Arc;

use otp_core::services::verification::MessageTransport;
use otp_shared::config::{SmsConfig, SmsProvider};

use crate::InfrastructureError;

pub use console::ConsoleTransport;
pub use twilio::TwilioTransport;

/// Build the transport selected by `config.provider`
///
/// A Twilio transport that cannot be built is an error; there is no fallback
/// to the console transport.
pub fn create_transport(
    config: &SmsConfig,
) -> Result<Arc<dyn MessageTransport>, InfrastructureError> {
    config
        .validate()
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    match config.provider {
        SmsProvider::Twilio => Ok(Arc::new(TwilioTransport::new(config)?)),
        SmsProvider::Console => {
            tracing::warn!("Using console SMS transport; messages are logged, not sent");
            Ok(Arc::new(ConsoleTransport::new()))
        }
    }
}
