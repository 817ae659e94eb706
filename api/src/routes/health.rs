use actix_web::{web, HttpResponse};

use otp_shared::types::HealthResponse;

use super::AppState;

/// Key probed to check the pending code store; never written
const HEALTH_PROBE_KEY: &str = "__health__";

/// Handler for GET /health
///
/// 200 while the pending code store answers, 503 otherwise.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let cache_ok = match state.cache.exists(HEALTH_PROBE_KEY).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the cache store");
            false
        }
    };

    let body = HealthResponse::new("otp-api", env!("CARGO_PKG_VERSION"), cache_ok);
    if body.is_healthy() {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
