use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use passcode_api::{create_app, AppState};
use passcode_core::{InMemoryStore, KeyValueStore, KeywordLookup};
use passcode_infra::{KeywordRegistry, RedisKeyValueStore};
use passcode_shared::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting passcode service"
    );

    let store = connect_store(&config).await?;

    let registry = Arc::new(
        KeywordRegistry::new(config.keywords.clone()).context("failed to build keyword registry")?,
    );
    if let Err(e) = registry.reload().await {
        tracing::warn!(error = %e, "Starting with an empty keyword table");
    }
    let _refresh = registry.clone().spawn_refresh();
    let keywords: Arc<dyn KeywordLookup> = registry;

    let state = web::Data::new(AppState::new(store, keywords, &config.passcode));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let cors = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;
    let mut server = HttpServer::new(move || create_app(state.clone(), &cors, max_payload_size));
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

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored);

    match config.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Redis store, or an in-process store in development when Redis is down
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match RedisKeyValueStore::connect(config.cache.clone()).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if config.environment.is_development() => {
            tracing::warn!(
                error = %e,
                "Redis unavailable, falling back to in-memory store (single process only)"
            );
            Ok(Arc::new(InMemoryStore::new()))
        }
        Err(e) => Err(e).context("failed to connect to Redis"),
    }
}
