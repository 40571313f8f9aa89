//! Scrape endpoint.
//!
//! Serves the current freshness snapshot in Prometheus text format. Each
//! request reads the store; nothing is pushed to scrapers.

use crate::metrics::exposition;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::get,
    Router,
};
use shared::storage::FreshnessStore;

/// Creates the scrape routes.
pub fn metrics_routes(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(scrape_metrics))
        .with_state(state)
}

async fn scrape_metrics(
    State(state): State<AppState>,
) -> Result<([(header::HeaderName, &'static str); 1], String), (StatusCode, String)> {
    let snapshot = state.store().snapshot().map_err(|e| {
        tracing::error!(error = %e, "Failed to read freshness snapshot");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok((
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        exposition::render(&snapshot),
    ))
}
