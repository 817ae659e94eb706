//! Console transport for development
//!
//! Prints the message to stdout instead of sending it. The structured log
//! only carries the masked recipient. `AppConfig::validate` refuses this
//! transport in production.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use uuid::Uuid;

use otp_core::errors::TransportError;
use otp_core::services::verification::MessageTransport;
use otp_shared::utils::phone::mask_phone;

/// Transport that prints messages to stdout
#[derive(Debug)]
pub struct ConsoleTransport {
    message_count: AtomicU64,
    console_output: bool,
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::with_output(true)
    }

    /// Transport that only counts and logs, for tests
    pub fn with_output(console_output: bool) -> Self {
        Self {
            message_count: AtomicU64::new(0),
            console_output,
        }
    }

    /// Number of messages "sent" so far
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageTransport for ConsoleTransport {
    async fn send(&self, to: &str, body: &str) -> Result<String, TransportError> {
        if to.trim().is_empty() {
            return Err(TransportError::InvalidRecipient("empty phone number".to_string()));
        }

        let message_id = format!("console-{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("CONSOLE SMS - MESSAGE #{}", count);
            println!("To: {}", to);
            println!("Message ID: {}", message_id);
            println!("Content: {}", body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            provider = "console",
            phone = %mask_phone(to),
            message_id = %message_id,
            message_length = body.len(),
            "SMS printed to console, not sent"
        );
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Console"
    }
}
