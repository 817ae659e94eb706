//! Twilio SMS transport
//!
//! Posts a form-encoded message (`To`, `From`, `Body`) to the configured
//! Twilio-compatible Messages endpoint using HTTP basic authentication with
//! the account id and auth token.
//!
//! A failed post is not retried.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info};

use otp_core::errors::TransportError;
use otp_core::services::verification::MessageTransport;
use otp_shared::config::SmsConfig;
use otp_shared::utils::phone::mask_phone;

use crate::InfrastructureError;

const PROVIDER: &str = "Twilio";

/// Longest gateway error body carried into an error message
const MAX_ERROR_BODY: usize = 256;

/// Subset of the Twilio message resource returned on success
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
}

/// Twilio SMS transport
pub struct TwilioTransport {
    client: Client,
    gateway_url: String,
    account: String,
    auth_token: String,
    from_number: String,
}

impl TwilioTransport {
    /// Create a transport from SMS configuration
    pub fn new(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        info!(
            from = %mask_phone(&config.from_number),
            timeout_secs = config.request_timeout_secs,
            "Twilio SMS transport initialized"
        );

        Ok(Self {
            client,
            gateway_url: config.gateway_url.clone(),
            account: config.account.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        })
    }
}

#[async_trait]
impl MessageTransport for TwilioTransport {
    async fn send(&self, to: &str, body: &str) -> Result<String, TransportError> {
        debug!(to = %mask_phone(to), "Posting message to Twilio");

        let form = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];
        let response = self
            .client
            .post(&self.gateway_url)
            .basic_auth(&self.account, Some(&self.auth_token))
            .form(&form[..])
            .send()
            .await
            .map_err(|e| {
                error!(to = %mask_phone(to), error = %e, "Twilio request failed");
                TransportError::Unreachable {
                    provider: PROVIDER.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        // A body read failure after a success status still means the message was accepted
        let text = response.text().await.unwrap_or_default();
        let message_id = classify_response(status, &text)?;

        info!(to = %mask_phone(to), message_id = %message_id, "SMS accepted by Twilio");
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}

/// Map a gateway response to a message id or a rejection
///
/// Any 2xx status counts as accepted. The id is the resource `sid` when the
/// body carries one.
pub(crate) fn classify_response(status: StatusCode, body: &str) -> Result<String, TransportError> {
    if !status.is_success() {
        error!(status = status.as_u16(), "Twilio rejected the message");
        return Err(TransportError::Rejected {
            provider: PROVIDER.to_string(),
            status: status.as_u16(),
            message: truncate(body, MAX_ERROR_BODY),
        });
    }

    let sid = serde_json::from_str::<MessageResource>(body)
        .ok()
        .and_then(|resource| resource.sid)
        .filter(|sid| !sid.is_empty());

    Ok(sid.unwrap_or_else(|| format!("twilio-{}", uuid::Uuid::new_v4())))
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
