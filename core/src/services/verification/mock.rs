//! In-process test doubles for the verification collaborators
//!
//! Compiled for the unit tests of this crate and, through the
//! `mock-services` feature, for the tests of the infra and API crates. Both
//! doubles record what they were asked to do and can be told to fail.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::{CacheError, TransportError};

use super::traits::{CacheStore, MessageTransport};

/// How a `MockTransport` should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// The gateway call does not complete
    Unreachable,
    /// The gateway answers with the given status
    Rejected(u16),
}

/// A message captured by `MockTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub body: String,
}

/// Message transport that records messages instead of sending them
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    failure: Mutex<Option<TransportFailure>>,
    counter: AtomicU64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails
    pub fn failing(failure: TransportFailure) -> Self {
        let transport = Self::default();
        transport.set_failure(Some(failure));
        transport
    }

    pub fn set_failure(&self, failure: Option<TransportFailure>) {
        *self.failure.lock().unwrap() = failure;
    }

    /// Every message handed to `send`, successful or not
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// The 6-digit code carried by the last message to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| extract_code(&m.body))
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send(&self, to: &str, body: &str) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_string(),
            body: body.to_string(),
        });

        match *self.failure.lock().unwrap() {
            Some(TransportFailure::Unreachable) => Err(TransportError::Unreachable {
                provider: "Mock".to_string(),
                message: "connection refused".to_string(),
            }),
            Some(TransportFailure::Rejected(status)) => Err(TransportError::Rejected {
                provider: "Mock".to_string(),
                status,
                message: "rejected by mock gateway".to_string(),
            }),
            None => {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("mock-msg-{}", n))
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

/// Cache store over a plain map, with switchable failures and a write log
#[derive(Default)]
pub struct MockCacheStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String, Option<Duration>)>>,
    fail_set: AtomicBool,
    fail_get: AtomicBool,
    fail_delete: AtomicBool,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_set(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    pub fn fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Every successful `set` call as `(key, value, ttl)`
    pub fn writes(&self) -> Vec<(String, String, Option<Duration>)> {
        self.writes.lock().unwrap().clone()
    }

    /// Current raw value under `key`, bypassing failure switches
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Overwrite `key` directly, bypassing failure switches
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn unavailable() -> CacheError {
        CacheError::Unavailable("mock cache failure".to_string())
    }
}

#[async_trait]
impl CacheStore for MockCacheStore {
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string(), ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut entries = self.entries.lock().unwrap();
        if entries.get(key).map(String::as_str) == Some(expected) {
            entries.remove(key);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// First run of six consecutive ASCII digits in a message body
fn extract_code(body: &str) -> Option<String> {
    let bytes = body.as_bytes();
    bytes
        .windows(6)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .map(|start| body[start..start + 6].to_string())
}
