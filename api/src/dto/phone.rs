use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use otp_core::domain::entities::{is_well_formed_code, VerificationRequest};
use otp_shared::utils::phone::{is_valid_phone, normalize_phone_number};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Phone number, as a JSON string or number
    /// Examples: "5599361530", "+1 (559) 936-1530", 5599361530
    #[serde(deserialize_with = "phone_from_string_or_number")]
    #[validate(custom = "validate_phone")]
    pub phone: String,
}

impl From<SendCodeRequest> for VerificationRequest {
    fn from(request: SendCodeRequest) -> Self {
        VerificationRequest::new(request.phone)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[serde(deserialize_with = "phone_from_string_or_number")]
    #[validate(custom = "validate_phone")]
    pub phone: String,

    /// 6-digit verification code; a JSON number is zero-padded to 6 digits
    #[serde(deserialize_with = "code_from_string_or_number")]
    #[validate(length(equal = 6), custom = "validate_code")]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub message: String,
    /// When the code stops being accepted; absent when codes do not expire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub matched: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

fn phone_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => normalize_phone_number(&s),
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn code_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.trim().to_string(),
        StringOrNumber::Number(n) if n < 1_000_000 => format!("{:06}", n),
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("phone must be 7 to 15 digits with an optional leading +".into());
        Err(err)
    }
}

fn validate_code(code: &str) -> Result<(), ValidationError> {
    if is_well_formed_code(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("code_format");
        err.message = Some("code must be 6 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_string_and_number() {
        let from_number: SendCodeRequest =
            serde_json::from_str(r#"{"phone": 5554443333}"#).unwrap();
        assert_eq!(from_number.phone, "5554443333");
        assert!(from_number.validate().is_ok());

        let from_string: SendCodeRequest =
            serde_json::from_str(r#"{"phone": "+1 (559) 936-1530"}"#).unwrap();
        assert_eq!(from_string.phone, "+15599361530");
        assert!(from_string.validate().is_ok());
    }

    #[test]
    fn test_invalid_phone_fails_validation() {
        let request: SendCodeRequest = serde_json::from_str(r#"{"phone": "call me"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_numeric_code_is_zero_padded() {
        let request: VerifyCodeRequest =
            serde_json::from_str(r#"{"phone": "5599361530", "code": 3007}"#).unwrap();
        assert_eq!(request.code, "003007");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_malformed_code_fails_validation() {
        for code in [r#""12345""#, r#""1234567""#, r#""12a456""#, "1234567"] {
            let body = format!(r#"{{"phone": "5599361530", "code": {}}}"#, code);
            let request: VerifyCodeRequest = serde_json::from_str(&body).unwrap();
            let errors = request.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("code"), "{}", code);
        }
    }

    #[test]
    fn test_missing_phone_is_rejected() {
        assert!(serde_json::from_str::<SendCodeRequest>("{}").is_err());
    }
}
