//! Marketplace API Binary
//!
//! Starts the neighborhood marketplace HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin marketplace-api
//! ```
//!
//! # Environment Variables
//!
//! - `MARKETPLACE_CONFIG`: Path to the YAML config (default: `config.yaml`,
//!   built-in defaults when absent)
//! - `RUST_LOG`: Overrides `observability.logging.level`
//!
//! Any `${VAR}` referenced from the config file is read from the
//! environment, including a `.env` file in the working directory or one of
//! its ancestors.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use marketplace_api::application::ports::MarketplaceStore;
use marketplace_api::config::{Config, StorageBackend, load_config};
use marketplace_api::infrastructure::config::{Container, connect_sqlite};
use marketplace_api::infrastructure::http::create_router;
use marketplace_api::infrastructure::persistence::InMemoryStore;
use marketplace_api::observability::{MetricsConfig, init_metrics};
use marketplace_api::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::var("MARKETPLACE_CONFIG").ok();
    let config = load_config(config_path.as_deref()).context("loading configuration")?;

    init_tracing(&config.observability.logging).context("initializing tracing")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Marketplace API");

    start_metrics(&config)?;

    match config.persistence.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            serve(Arc::new(InMemoryStore::new()), &config).await
        }
        StorageBackend::Sqlite => {
            let store = connect_sqlite(&config.persistence)
                .await
                .context("opening sqlite store")?;
            serve(Arc::new(store), &config).await
        }
    }
}

fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

fn start_metrics(config: &Config) -> anyhow::Result<()> {
    let settings = &config.observability.metrics;
    if !settings.enabled {
        tracing::debug!("Metrics exporter disabled");
        return Ok(());
    }

    let addr: SocketAddr = settings
        .listen_addr
        .parse()
        .with_context(|| format!("parsing metrics address '{}'", settings.listen_addr))?;
    init_metrics(&MetricsConfig::with_addr(addr)).context("starting metrics exporter")?;
    Ok(())
}

async fn serve<S>(store: Arc<S>, config: &Config) -> anyhow::Result<()>
where
    S: MarketplaceStore,
{
    let container = Container::new(store, config).context("wiring application")?;
    let app = create_router(container.app_state());

    let http_addr = config.server.listen_addr();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("binding {http_addr}"))?;

    tracing::info!(
        %http_addr,
        backend = ?config.persistence.backend,
        transition_policy = ?config.orders.transition_policy,
        "HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Marketplace API stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// If a handler cannot be installed, that branch never completes and the
/// other signal still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
