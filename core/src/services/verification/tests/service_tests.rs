//! Unit tests for verification service

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::PendingCode;
use crate::errors::{StorageStage, TransportError, VerificationError};
use crate::services::verification::mock::{MockCacheStore, MockTransport, TransportFailure};
use crate::services::verification::{
    CacheStore, CodeGenerator, CodeStrategy, VerificationService, VerificationServiceConfig,
    PAIRED_DRAW_BOUND,
};

const PHONE: &str = "5599361530";

struct FixedGenerator(&'static str);

impl CodeGenerator for FixedGenerator {
    fn generate(&self) -> Result<String, rand::Error> {
        Ok(self.0.to_string())
    }
}

struct ExhaustedGenerator;

impl CodeGenerator for ExhaustedGenerator {
    fn generate(&self) -> Result<String, rand::Error> {
        Err(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "entropy source exhausted",
        )))
    }
}

type TestService = VerificationService<MockTransport, MockCacheStore>;

fn service() -> (TestService, Arc<MockTransport>, Arc<MockCacheStore>) {
    let transport = Arc::new(MockTransport::new());
    let cache = Arc::new(MockCacheStore::new());
    let service = VerificationService::new(
        transport.clone(),
        cache.clone(),
        VerificationServiceConfig::default(),
    );
    (service, transport, cache)
}

fn stored_code(cache: &MockCacheStore, phone: &str) -> Option<String> {
    cache
        .raw(phone)
        .map(|raw| PendingCode::decode(phone, &raw).unwrap().code)
}

#[tokio::test]
async fn test_send_code_delivers_and_stores() {
    let (service, transport, cache) = service();

    let result = service.send_code(PHONE).await.unwrap();
    assert_eq!(result.phone_number, PHONE);
    assert!(result.message_id.starts_with("mock-msg-"));
    assert_eq!(
        result.expires_at,
        Some(result.created_at + chrono::Duration::seconds(300))
    );

    let messages = transport.sent_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].to, PHONE);

    let sent = transport.last_code_for(PHONE).unwrap();
    assert_eq!(messages[0].body, format!("Your verification code: {}", sent));
    assert_eq!(stored_code(&cache, PHONE), Some(sent));

    let writes = cache.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, PHONE);
    assert_eq!(writes[0].2, Some(Duration::from_secs(300)));
}

#[tokio::test]
async fn test_sent_code_uses_paired_draw_format() {
    let (service, transport, _cache) = service();

    for _ in 0..20 {
        service.send_code(PHONE).await.unwrap();
        let code = transport.last_code_for(PHONE).unwrap();
        let first: u32 = code[..3].parse().unwrap();
        let second: u32 = code[3..].parse().unwrap();
        assert!(first < PAIRED_DRAW_BOUND);
        assert!(second < PAIRED_DRAW_BOUND);
    }
}

#[tokio::test]
async fn test_send_then_verify_matches_once() {
    let (service, transport, cache) = service();

    service.send_code(PHONE).await.unwrap();
    let code = transport.last_code_for(PHONE).unwrap();

    assert!(service.verify_code(PHONE, &code).await.unwrap().matched);
    assert!(cache.raw(PHONE).is_none());

    // Consumed on first match
    assert!(!service.verify_code(PHONE, &code).await.unwrap().matched);
}

#[tokio::test]
async fn test_verify_without_send_is_unmatched() {
    let (service, _transport, _cache) = service();

    let result = service.verify_code(PHONE, "003007").await.unwrap();
    assert!(!result.matched);
}

#[tokio::test]
async fn test_wrong_code_keeps_pending_code() {
    let (service, _transport, cache) = service();
    let service = service.with_generator(Arc::new(FixedGenerator("003007")));

    service.send_code(PHONE).await.unwrap();

    assert!(!service.verify_code(PHONE, "007003").await.unwrap().matched);
    assert_eq!(stored_code(&cache, PHONE).as_deref(), Some("003007"));

    assert!(service.verify_code(PHONE, "003007").await.unwrap().matched);
}

#[tokio::test]
async fn test_malformed_code_skips_store() {
    let (service, _transport, cache) = service();
    let service = service.with_generator(Arc::new(FixedGenerator("003007")));
    service.send_code(PHONE).await.unwrap();

    // A read would fail, so an Ok(false) proves the store was not touched
    cache.fail_get(true);
    for code in ["", "3007", "0030070", "00300a", " 003007"] {
        assert!(!service.verify_code(PHONE, code).await.unwrap().matched);
    }
}

#[tokio::test]
async fn test_new_send_replaces_previous_code() {
    let (service, _transport, cache) = service();

    let first = service.with_generator(Arc::new(FixedGenerator("001001")));
    first.send_code(PHONE).await.unwrap();

    let second = first.with_generator(Arc::new(FixedGenerator("002002")));
    second.send_code(PHONE).await.unwrap();

    assert_eq!(stored_code(&cache, PHONE).as_deref(), Some("002002"));
    assert!(!second.verify_code(PHONE, "001001").await.unwrap().matched);
    assert!(second.verify_code(PHONE, "002002").await.unwrap().matched);
}

#[tokio::test]
async fn test_codes_are_bound_to_phone_number() {
    let (service, _transport, _cache) = service();
    let service = service.with_generator(Arc::new(FixedGenerator("003007")));

    service.send_code(PHONE).await.unwrap();

    assert!(!service.verify_code("5550001111", "003007").await.unwrap().matched);
    assert!(service.verify_code(PHONE, "003007").await.unwrap().matched);
}

#[tokio::test]
async fn test_transport_failure_stores_nothing() {
    let transport = Arc::new(MockTransport::failing(TransportFailure::Unreachable));
    let cache = Arc::new(MockCacheStore::new());
    let service = VerificationService::new(
        transport.clone(),
        cache.clone(),
        VerificationServiceConfig::default(),
    );

    let err = service.send_code(PHONE).await.unwrap_err();
    assert!(matches!(
        err,
        VerificationError::Transport(TransportError::Unreachable { .. })
    ));
    assert_eq!(transport.send_count(), 1);
    assert!(cache.writes().is_empty());
    assert!(!cache.exists(PHONE).await.unwrap());
}

#[tokio::test]
async fn test_transport_rejection_keeps_status() {
    let transport = Arc::new(MockTransport::failing(TransportFailure::Rejected(400)));
    let cache = Arc::new(MockCacheStore::new());
    let service =
        VerificationService::new(transport, cache.clone(), VerificationServiceConfig::default());

    match service.send_code(PHONE).await.unwrap_err() {
        VerificationError::Transport(TransportError::Rejected { status, .. }) => {
            assert_eq!(status, 400)
        }
        other => panic!("Expected rejected transport error, got {:?}", other),
    }
    assert!(cache.writes().is_empty());
}

#[tokio::test]
async fn test_failed_send_keeps_earlier_code() {
    let (service, transport, cache) = service();
    let service = service.with_generator(Arc::new(FixedGenerator("003007")));
    service.send_code(PHONE).await.unwrap();

    transport.set_failure(Some(TransportFailure::Unreachable));
    let service = service.with_generator(Arc::new(FixedGenerator("111111")));
    assert!(service.send_code(PHONE).await.is_err());

    assert_eq!(stored_code(&cache, PHONE).as_deref(), Some("003007"));
    assert!(service.verify_code(PHONE, "003007").await.unwrap().matched);
}

#[tokio::test]
async fn test_store_failure_after_send_is_reported() {
    let (service, transport, cache) = service();
    cache.fail_set(true);

    let err = service.send_code(PHONE).await.unwrap_err();
    assert!(err.is_sent_but_not_stored());
    assert!(matches!(
        err,
        VerificationError::Storage {
            stage: StorageStage::PersistAfterSend,
            ..
        }
    ));

    // The message went out even though nothing was stored
    assert_eq!(transport.send_count(), 1);
    assert!(cache.raw(PHONE).is_none());
}

#[tokio::test]
async fn test_random_source_failure_sends_nothing() {
    let (service, transport, cache) = service();
    let service = service.with_generator(Arc::new(ExhaustedGenerator));

    let err = service.send_code(PHONE).await.unwrap_err();
    assert!(matches!(err, VerificationError::RandomSource(_)));
    assert_eq!(transport.send_count(), 0);
    assert!(cache.writes().is_empty());
}

#[tokio::test]
async fn test_invalid_phone_is_rejected_before_send() {
    let (service, transport, _cache) = service();

    let err = service.send_code("not-a-phone").await.unwrap_err();
    assert!(matches!(err, VerificationError::InvalidPhoneNumber { .. }));
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_read_failure_is_storage_error() {
    let (service, _transport, cache) = service();
    cache.fail_get(true);

    let err = service.verify_code(PHONE, "003007").await.unwrap_err();
    assert!(matches!(
        err,
        VerificationError::Storage {
            stage: StorageStage::Read,
            ..
        }
    ));
}

#[tokio::test]
async fn test_consume_failure_is_storage_error() {
    let (service, _transport, cache) = service();
    let service = service.with_generator(Arc::new(FixedGenerator("003007")));
    service.send_code(PHONE).await.unwrap();
    cache.fail_delete(true);

    let err = service.verify_code(PHONE, "003007").await.unwrap_err();
    assert!(matches!(
        err,
        VerificationError::Storage {
            stage: StorageStage::Consume,
            ..
        }
    ));
}

#[tokio::test]
async fn test_corrupt_entry_is_storage_error() {
    let (service, _transport, cache) = service();
    cache.insert_raw(PHONE, "003007");

    let err = service.verify_code(PHONE, "003007").await.unwrap_err();
    assert!(matches!(
        err,
        VerificationError::Storage {
            stage: StorageStage::Read,
            ..
        }
    ));
}

#[tokio::test]
async fn test_zero_ttl_stores_without_expiry() {
    let transport = Arc::new(MockTransport::new());
    let cache = Arc::new(MockCacheStore::new());
    let config = VerificationServiceConfig {
        code_ttl: None,
        ..VerificationServiceConfig::default()
    };
    let service = VerificationService::new(transport, cache.clone(), config);

    let result = service.send_code(PHONE).await.unwrap();
    assert!(result.expires_at.is_none());
    assert_eq!(cache.writes()[0].2, None);
}

#[tokio::test]
async fn test_full_range_strategy_and_custom_template() {
    let transport = Arc::new(MockTransport::new());
    let cache = Arc::new(MockCacheStore::new());
    let config = VerificationServiceConfig {
        code_strategy: CodeStrategy::FullRange,
        message_template: "Zume verification code: {code}".to_string(),
        ..VerificationServiceConfig::default()
    };
    let service = VerificationService::new(transport.clone(), cache, config);

    service.send_code(PHONE).await.unwrap();
    let code = transport.last_code_for(PHONE).unwrap();
    assert_eq!(
        transport.sent_messages()[0].body,
        format!("Zume verification code: {}", code)
    );
    assert!(service.verify_code(PHONE, &code).await.unwrap().matched);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verifies_match_exactly_once() {
    let (service, _transport, _cache) = service();
    let service = Arc::new(service.with_generator(Arc::new(FixedGenerator("003007"))));
    service.send_code(PHONE).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.verify_code(PHONE, "003007").await })
        })
        .collect();

    let mut matched = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().matched {
            matched += 1;
        }
    }
    assert_eq!(matched, 1);
}

#[tokio::test]
async fn test_dispatch_sends_without_storing() {
    let (service, transport, cache) = service();
    let service = service.with_generator(Arc::new(FixedGenerator("003007")));

    let dispatched = service.dispatch_code(PHONE).await.unwrap();
    assert_eq!(dispatched.phone_number(), PHONE);
    assert_eq!(dispatched.message_id(), "mock-msg-1");
    assert_eq!(transport.send_count(), 1);
    assert!(cache.writes().is_empty());
    assert!(!service.verify_code(PHONE, "003007").await.unwrap().matched);

    let result = service.store_code(dispatched).await.unwrap();
    assert_eq!(result.message_id, "mock-msg-1");
    assert_eq!(stored_code(&cache, PHONE).as_deref(), Some("003007"));
    assert!(service.verify_code(PHONE, "003007").await.unwrap().matched);
}

#[tokio::test]
async fn test_store_failure_after_dispatch() {
    let (service, transport, cache) = service();

    let dispatched = service.dispatch_code(PHONE).await.unwrap();
    cache.fail_set(true);

    let err = service.store_code(dispatched).await.unwrap_err();
    assert!(err.is_sent_but_not_stored());
    assert_eq!(transport.send_count(), 1);
}
