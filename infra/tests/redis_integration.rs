//! Integration tests for the Redis cache store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p otp_infra --test redis_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use otp_core::services::verification::mock::MockTransport;
use otp_core::{CacheStore, PendingCode, VerificationService, VerificationServiceConfig};
use otp_infra::cache::RedisCacheStore;
use otp_shared::config::CacheConfig;

fn config(prefix: &str) -> CacheConfig {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    CacheConfig {
        key_prefix: format!("test:{}", prefix),
        ..CacheConfig::redis(url)
    }
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_get_delete() {
    let store = RedisCacheStore::connect(config("basic")).await.unwrap();
    assert!(store.client().health_check().await.unwrap());

    store.set("5599361530", "value", None).await.unwrap();
    assert_eq!(
        store.get("5599361530").await.unwrap().as_deref(),
        Some("value")
    );
    assert!(store.exists("5599361530").await.unwrap());

    // Prefix is applied on the server side key
    assert!(store
        .client()
        .exists("test:basic:5599361530")
        .await
        .unwrap());

    assert!(store.delete("5599361530").await.unwrap());
    assert!(!store.delete("5599361530").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_ttl_expiry() {
    let store = RedisCacheStore::connect(config("ttl")).await.unwrap();

    store
        .set("5599361530", "value", Some(Duration::from_millis(200)))
        .await
        .unwrap();
    assert!(store.get("5599361530").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(store.get("5599361530").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_compare_and_delete() {
    let store = RedisCacheStore::connect(config("cad")).await.unwrap();
    store.set("5599361530", "v1", None).await.unwrap();

    assert!(!store.delete_if_equals("5599361530", "v2").await.unwrap());
    assert!(store.delete_if_equals("5599361530", "v1").await.unwrap());
    assert!(!store.delete_if_equals("5599361530", "v1").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_verification_flow_over_redis() {
    let store = Arc::new(RedisCacheStore::connect(config("flow")).await.unwrap());
    let transport = Arc::new(MockTransport::new());
    let service = VerificationService::new(
        transport.clone(),
        store.clone(),
        VerificationServiceConfig::default(),
    );

    service.send_code("5599361530").await.unwrap();

    let raw = store.get("5599361530").await.unwrap().unwrap();
    let code = PendingCode::decode("5599361530", &raw).unwrap().code;
    assert_eq!(transport.last_code_for("5599361530"), Some(code.clone()));

    assert!(service.verify_code("5599361530", &code).await.unwrap().matched);
    assert!(!service.verify_code("5599361530", &code).await.unwrap().matched);
}
