//! HTTP surface of the phone verification service
//!
//! `app::create_app` assembles the actix-web application from an `AppState`;
//! the binary in `main.rs` builds that state from the environment.

pub mod app;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use errors::ApiError;
pub use routes::AppState;
