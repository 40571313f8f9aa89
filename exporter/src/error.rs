//! Error types for the exporter.

use shared::storage::StoreError;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from a single fetch-and-publish cycle.
///
/// None of these leave the poller: the cycle is skipped and the loop waits
/// for the next tick.
#[derive(Debug, Error)]
pub enum PollError {
    /// The request could not complete (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Shutdown was requested while the request was in flight.
    #[error("Fetch cancelled by shutdown")]
    Cancelled,

    /// The response body was not a valid freshness report.
    #[error("Failed to parse response: {source} / body: {body}")]
    Parse {
        /// Underlying JSON error.
        source: serde_json::Error,
        /// Raw body, lossily decoded, kept for diagnosis.
        body: String,
    },

    /// Publishing to the freshness store failed.
    #[error("Failed to publish freshness: {0}")]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for PollError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Errors that terminate the scrape server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The scrape listener could not bind its port.
    #[error("Failed to bind scrape listener on {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The server failed while accepting or serving connections.
    #[error("Scrape server failed: {0}")]
    Serve(#[source] std::io::Error),

    /// The HTTP client for the upstream API could not be built.
    #[error("Failed to build upstream HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
