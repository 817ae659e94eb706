//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Optional leading '+', then 7 to 15 digits
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{7,15}$").expect("phone regex is valid")
});

/// Normalize a phone number by removing common formatting characters
///
/// Only spaces, dashes, dots and parentheses are dropped; anything else is
/// kept so that `is_valid_phone` can reject it.
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Check if a normalized phone number is acceptable as a verification subject
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Mask a phone number for logs, keeping only the last 4 digits
///
/// ```
/// use otp_shared::utils::phone::mask_phone;
/// assert_eq!(mask_phone("5599361530"), "******1530");
/// ```
pub fn mask_phone(phone: &str) -> String {
    let count = phone.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i >= count - 4 || (i == 0 && c == '+') {
                c
            } else {
                '*'
            }
        })
        .collect()
}
