//! Poller task ownership.
//!
//! [`PollerTask`] pairs the spawned poll loop with the token that stops it,
//! so the server can cancel and join the poller on shutdown.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::metrics::Poller;
use crate::upstream::FreshnessSource;

/// Handle to a poller running on a background task.
pub struct PollerTask {
    cancellation: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollerTask {
    /// Spawns the poll loop on the current runtime.
    #[must_use]
    pub fn spawn<S>(poller: Poller<S>) -> Self
    where
        S: FreshnessSource + 'static,
    {
        let cancellation = CancellationToken::new();
        let handle = tokio::spawn(poller.run(cancellation.clone()));

        Self {
            cancellation,
            handle,
        }
    }

    /// Returns a clone of the token that stops the poller.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Cancels the poller and waits for the loop to exit.
    ///
    /// An in-flight request is dropped; latency is bounded by the fetch timeout
    /// at worst.
    pub async fn shutdown(self) {
        self.cancellation.cancel();

        match self.handle.await {
            Ok(()) => tracing::info!("Freshness poller stopped"),
            Err(e) => tracing::error!(error = %e, "Freshness poller task failed"),
        }
    }
}
