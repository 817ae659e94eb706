//! Send and verify flow over the crate's public surface

use std::sync::Arc;

use crate::services::verification::mock::{MockCacheStore, MockTransport};
use crate::{
    CacheStore, MessageTransport, PendingCode, VerificationService, VerificationServiceConfig,
};

const PHONE: &str = "5599361530";

#[tokio::test]
async fn test_send_and_verify_with_stored_code() {
    let transport = Arc::new(MockTransport::new());
    let cache = Arc::new(MockCacheStore::new());
    let service = VerificationService::new(
        transport.clone(),
        cache.clone(),
        VerificationServiceConfig::default(),
    );

    service.send_code(PHONE).await.unwrap();

    let raw = cache.get(PHONE).await.unwrap().expect("pending code stored");
    let pending = PendingCode::decode(PHONE, &raw).unwrap();
    assert_eq!(pending.phone_number, PHONE);
    assert_eq!(transport.last_code_for(PHONE), Some(pending.code.clone()));

    assert!(service.verify_code(PHONE, &pending.code).await.unwrap().matched);
    assert!(!cache.exists(PHONE).await.unwrap());
    assert!(!service.verify_code(PHONE, &pending.code).await.unwrap().matched);
}

#[tokio::test]
async fn test_service_over_trait_objects() {
    let transport: Arc<dyn MessageTransport> = Arc::new(MockTransport::new());
    let cache: Arc<dyn CacheStore> = Arc::new(MockCacheStore::new());
    let service: VerificationService<dyn MessageTransport, dyn CacheStore> =
        VerificationService::new(transport, cache.clone(), VerificationServiceConfig::default());

    let result = service.send_code(PHONE).await.unwrap();
    assert_eq!(result.phone_number, PHONE);

    let raw = cache.get(PHONE).await.unwrap().unwrap();
    let code = PendingCode::decode(PHONE, &raw).unwrap().code;

    assert!(!service.verify_code(PHONE, "999999").await.unwrap().matched);
    assert!(service.verify_code(PHONE, &code).await.unwrap().matched);
}
