use actix_web::{web, HttpServer};
use anyhow::Context;

use otp_api::{create_app, telemetry, AppState};
use otp_core::VerificationServiceConfig;
use otp_infra::{create_cache_store, create_transport};
use otp_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        cache_backend = ?config.cache.backend,
        sms_provider = ?config.sms.provider,
        "Starting phone verification API"
    );

    let cache = create_cache_store(&config.cache)
        .await
        .context("failed to initialize cache store")?;
    let transport = create_transport(&config.sms).context("failed to initialize SMS transport")?;

    let state = web::Data::new(AppState::new(
        transport,
        cache,
        VerificationServiceConfig::from_configs(&config.verification, &config.sms),
        config.server.request_timeout(),
    ));

    let bind_address = config.server.bind_address();
    tracing::info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
