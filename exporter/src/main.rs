//! DTMS Freshness Exporter Binary
//!
//! Entry point for the freshness exporter. Exits non-zero only when the
//! scrape listener cannot be started or fails.

#![deny(unsafe_code)]

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env for local runs; real deployments set the environment.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = exporter::run_server().await {
        tracing::error!(error = %e, "Freshness exporter failed");
        return Err(e);
    }

    Ok(())
}
