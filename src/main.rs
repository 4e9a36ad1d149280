//! RemixCuisine Engine
//!
//! Serves the profile store, reward ledger and AI recipe generation to the
//! RemixCuisine front-end over HTTP.
//!
//! # Graceful Shutdown
//!
//! SIGTERM and SIGINT stop the API server and close the database pool.

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use remixcuisine::config::StorageBackend;
use remixcuisine::storage::postgres::run_migrations;
use remixcuisine::{
    api, AnthropicGenerator, Config, KeyValueStore, MemoryStore, PgStore, ProfileStore, Result,
    RewardLedger, Session,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("═══════════════════════════════════════════════════════════════");
    info!("  🍳 RemixCuisine Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════════════════════════");

    let config = Config::from_env()?;
    info!("✅ Configuration loaded and validated");

    // Storage backend
    let mut pg_store = None;
    let store: Arc<dyn KeyValueStore> = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("⚠️ Using in-memory storage, state is lost on exit");
            Arc::new(MemoryStore::new(config.storage.owner.clone()))
        }
        StorageBackend::Postgres => {
            let pg = PgStore::connect(&config.storage.database, &config.storage.owner).await?;
            run_migrations(pg.pool()).await?;
            info!("✅ Database connection pool established");
            pg_store = Some(pg.clone());
            Arc::new(pg)
        }
    };

    let generator = Arc::new(AnthropicGenerator::new(&config.generator)?);
    info!("✅ Recipe generator ready ({})", config.generator.model);

    let session = Arc::new(Session::new(
        ProfileStore::new(store),
        RewardLedger::new(),
        generator,
        config.storage.default_name.clone(),
    ));
    let profile = session.bootstrap().await?;
    info!(
        "✅ Session ready for '{}' ({} tokens, {} badges)",
        profile.name,
        profile.tokens,
        profile.badges.len()
    );

    let server = {
        let session = session.clone();
        let host = config.api.host.clone();
        let port = config.api.port;
        let cors = config.api.cors_enabled;
        tokio::spawn(async move {
            if let Err(e) = api::start_server(session, &host, port, cors).await {
                error!("API server error: {:?}", e);
            }
        })
    };

    info!(
        "  📡 API: http://{}:{}/api/v1",
        config.api.host, config.api.port
    );

    tokio::select! {
        _ = shutdown_signal() => {
            info!("📴 Shutdown signal received");
        }
        _ = server => {
            warn!("⚠️ API server stopped, shutting down");
        }
    }

    if let Some(pg) = pg_store {
        pg.close().await;
    }

    info!("👋 RemixCuisine Engine stopped gracefully");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "remixcuisine_engine=debug,remixcuisine=debug,tower_http=debug,sqlx=warn,info",
        )
    });

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(std::env::var("NO_COLOR").is_err()),
            )
            .init();
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
