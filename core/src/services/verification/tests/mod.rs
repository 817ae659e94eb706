//! Unit tests for the verification service

mod flow_tests;
mod service_tests;
