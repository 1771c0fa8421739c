use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_api::config::{Environment, ServerConfig};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_db::mongo::MongoProductStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();

    // --- Tracing ---
    let environment = config
        .as_ref()
        .map(|c| c.environment)
        .unwrap_or(Environment::Production);
    init_tracing(environment);

    // --- Configuration ---
    let config = config.context("Invalid configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.mongo.database,
        collection = %config.mongo.collection,
        "Loaded server configuration"
    );

    // --- Database ---
    let store = MongoProductStore::connect(&config.mongo)
        .await
        .context("Cannot start server: MongoDB connection failed")?;
    tracing::info!("MongoDB connection established");

    if let Err(e) = store.ensure_indexes().await {
        tracing::warn!(error = %e, "Failed to ensure product_id index");
    }

    // --- App state ---
    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Human-readable debug logs in development, JSON logs otherwise.
/// `RUST_LOG` overrides the default filter in both modes.
fn init_tracing(environment: Environment) {
    let default_filter = if environment.is_development() {
        "catalog_api=debug,catalog_db=debug,tower_http=debug"
    } else {
        "catalog_api=info,catalog_db=info,tower_http=info"
    };

    let (pretty, json) = if environment.is_development() {
        (Some(tracing_subscriber::fmt::layer()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(pretty)
        .with(json)
        .init();
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
