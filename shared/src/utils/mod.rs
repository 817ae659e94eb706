//! Common utility functions

pub mod phone;

pub use phone::{is_valid_phone, mask_phone, normalize_phone_number};
