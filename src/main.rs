//! accom-guard: security gateway for the accommodation review API.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────────┐
//!                    │                   ACCOM-GUARD                     │
//!                    │                                                   │
//!   Client Request   │  ┌─────────┐   ┌────────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│ middleware │──▶│  handlers   │  │
//!                    │  │ server  │   │ rate limit │   │ validate +  │  │
//!                    │  └─────────┘   │ + CSRF     │   │ sanitize    │  │
//!                    │                └────────────┘   └─────────────┘  │
//!                    │                                                   │
//!                    │  ┌─────────────────────────────────────────────┐  │
//!                    │  │            Cross-Cutting Concerns            │  │
//!                    │  │  ┌────────┐ ┌───────────┐ ┌──────────────┐  │  │
//!                    │  │  │ config │ │observabil-│ │  lifecycle   │  │  │
//!                    │  │  │+reload │ │ity        │ │start/shutdown│  │  │
//!                    │  │  └────────┘ └───────────┘ └──────────────┘  │  │
//!                    │  └─────────────────────────────────────────────┘  │
//!                    └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accom_guard::config::{load_config, ConfigWatcher, GuardConfig};
use accom_guard::http::GuardServer;
use accom_guard::lifecycle::{signals, Shutdown};
use accom_guard::observability::metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accom_guard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("accom-guard v{} starting", env!("CARGO_PKG_VERSION"));

    // Load configuration; defaults apply without a config file argument.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit_enabled = config.rate_limit.enabled,
        csrf_enabled = config.csrf.enabled,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    // Metrics exporter.
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Hot reload only applies when running from a config file.
    let (config_updates, _watcher) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            let handle = watcher.run()?;
            (updates, Some(handle))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    // Bind TCP listener.
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = GuardServer::new(config);
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
