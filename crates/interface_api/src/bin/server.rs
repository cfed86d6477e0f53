//! Quote Workflow API Server Binary
//!
//! This binary starts the HTTP API server for the quote request workflow.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin quote-api
//!
//! # Run with environment variables
//! API_PORT=8080 API_AGENT_NAME="Nairobi Branch" cargo run --bin quote-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_AGENT_NAME` - Agent stamped on committed quotes (default: Web Portal)
//! * `API_QUOTE_VALIDITY_DAYS` - Days a quote stays valid, at most 3650 (default: 30)
//! * `API_SESSION_TTL_MINUTES` - Idle minutes before a session is evicted (default: 30)
//! * `API_CURRENCY` - Catalog currency code (default: KES)
//! * `API_PRINT_OUTPUT_DIR` - Directory for printed quote documents

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_quote::QuoteWorkflowService;
use interface_api::{build_service, config::ApiConfig, create_router};

/// Main entry point for the API server.
///
/// Loads configuration, initializes logging, wires the workflow service and
/// serves until a shutdown signal arrives.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load API configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        agent = %config.agent_name,
        currency = %config.currency,
        "Starting Quote Workflow API Server"
    );

    let service = build_service(&config).context("invalid quote workflow settings")?;
    tracing::info!(
        products = service.catalog().list().len(),
        print_output_dir = %config.print_output_dir.display(),
        "Quote workflow service ready"
    );

    let service = Arc::new(service);
    spawn_session_sweeper(Arc::clone(&service));

    let app = create_router(service, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Periodically evicts idle workflow sessions, at half the session TTL.
fn spawn_session_sweeper(service: Arc<QuoteWorkflowService>) {
    let period = service
        .session_ttl()
        .to_std()
        .map(|ttl| ttl / 2)
        .unwrap_or(Duration::from_secs(60))
        .max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            service.evict_idle_sessions().await;
        }
    });
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
