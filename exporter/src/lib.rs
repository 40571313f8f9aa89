//! DTMS Freshness Exporter
//!
//! This crate polls the DTMS API for per-site data freshness and republishes
//! it as Prometheus gauges.
//!
//! # Architecture
//!
//! - A [`Poller`] runs on a background task, fetching `GET <API_BASE_URL>/freshness`
//!   once per interval and writing each site into a shared [`FreshnessStore`].
//! - An Axum server serves `GET /metrics` by reading that store on every
//!   scrape.
//! - On SIGINT/SIGTERM the poller is cancelled first, then the listener stops
//!   accepting connections and in-flight scrapes complete.
//!
//! Fetch failures are logged and the cycle is skipped; metrics keep their
//! previous values until the next successful cycle. There is deliberately no
//! retry between ticks.
//!
//! # Example
//!
//! ```no_run
//! use exporter::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```
//!
//! [`FreshnessStore`]: shared::storage::FreshnessStore

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod lifecycle;
pub mod metrics;
mod routes;
mod state;
mod upstream;

pub use config::{Config, PollConfig};
pub use error::{PollError, ServeError};
pub use lifecycle::PollerTask;
pub use metrics::Poller;
pub use state::AppState;
pub use upstream::{FreshnessSource, HttpFreshnessSource};

use anyhow::Result;
use axum::Router;
use shared::storage::InMemoryFreshnessStore;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the freshness exporter.
///
/// Loads configuration from environment variables, starts the poller and
/// serves the scrape endpoint until SIGTERM/SIGINT.
///
/// # Errors
///
/// Returns an error if:
/// - The upstream HTTP client cannot be built
/// - The server fails to bind to the configured address
/// - A fatal error occurs while serving
pub async fn run_server() -> Result<()> {
    let config = Config::from_env();
    run_server_with_config(config).await
}

/// Runs the freshness exporter with the provided configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The upstream HTTP client cannot be built
/// - The server fails to bind to the configured address
/// - A fatal error occurs while serving
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        upstream = %config.poll.freshness_url(),
        interval_secs = config.poll.interval.as_secs(),
        threshold_secs = config.poll.freshness_threshold_secs,
        "DTMS freshness exporter starting"
    );

    let state = AppState::new(InMemoryFreshnessStore::new_shared());
    let source = HttpFreshnessSource::new(&config.poll).map_err(ServeError::Client)?;
    let poller = PollerTask::spawn(Poller::new(source, state.shared_store(), &config.poll));

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(source) => {
            poller.shutdown().await;
            return Err(ServeError::Bind { addr, source }.into());
        }
    };

    serve(listener, state, poller, shutdown_signal()).await?;
    Ok(())
}

/// Serves the scrape endpoint on `listener` until `shutdown` resolves.
///
/// When `shutdown` resolves the poller is cancelled before the listener stops
/// accepting new connections. In-flight requests are allowed to finish. The
/// poller is joined before this returns, on both the clean and error paths.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    poller: PollerTask,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Listening for connections");
    }

    let cancellation = poller.cancellation_token();
    let app = create_router(state);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            cancellation.cancel();
        })
        .await;

    poller.shutdown().await;
    result.map_err(ServeError::Serve)?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::metrics_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
