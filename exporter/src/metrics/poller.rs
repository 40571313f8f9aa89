//! Freshness poller.
//!
//! Periodically fetches the upstream freshness report and publishes one
//! [`SiteFreshness`] per site into the shared store.

use shared::models::{FreshnessReport, SiteFreshness};
use shared::storage::FreshnessStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::PollConfig;
use crate::error::PollError;
use crate::upstream::FreshnessSource;

/// Background poller publishing upstream freshness into a store.
///
/// The poller is the only writer of the store. Cycles run strictly one after
/// another, so writes for a site are ordered by cycle.
pub struct Poller<S> {
    source: S,
    store: Arc<dyn FreshnessStore>,
    interval_duration: Duration,
    threshold_seconds: f64,
}

impl<S: FreshnessSource> Poller<S> {
    /// Creates a new poller.
    ///
    /// # Arguments
    ///
    /// * `source` - Upstream transport
    /// * `store` - Store receiving published values
    /// * `config` - Interval and freshness threshold
    #[must_use]
    pub fn new(source: S, store: Arc<dyn FreshnessStore>, config: &PollConfig) -> Self {
        Self {
            source,
            store,
            interval_duration: config.interval,
            threshold_seconds: config.threshold_seconds(),
        }
    }

    /// Runs one fetch-and-publish cycle.
    ///
    /// If `shutdown` fires while the request is in flight the request is
    /// dropped and nothing is published. Once the body has arrived, parsing
    /// and publishing run to completion.
    ///
    /// Returns the number of sites published.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails, is cancelled, the body does not
    /// parse, or the store rejects a write. Fetch and parse errors leave the
    /// store untouched.
    pub async fn poll_once(&self, shutdown: &CancellationToken) -> Result<usize, PollError> {
        let body = tokio::select! {
            biased;

            () = shutdown.cancelled() => return Err(PollError::Cancelled),

            result = self.source.fetch() => result?,
        };

        let report = FreshnessReport::from_slice(&body).map_err(|source| PollError::Parse {
            source,
            body: String::from_utf8_lossy(&body).into_owned(),
        })?;

        self.publish(&report)
    }

    /// Writes every record of a report into the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects a write.
    pub fn publish(&self, report: &FreshnessReport) -> Result<usize, PollError> {
        for record in &report.sites {
            let entry = SiteFreshness::evaluate(record, self.threshold_seconds);

            tracing::info!(
                site = %entry.site,
                age_seconds = entry.age_seconds,
                fresh = entry.is_fresh,
                "Site freshness updated"
            );

            self.store.set(entry)?;
        }

        Ok(report.sites.len())
    }

    /// Runs the poll loop until `shutdown` is cancelled.
    ///
    /// The first cycle starts one interval after this is called. Errors are
    /// logged and the loop waits for the next tick; there is no retry in
    /// between.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval_duration.as_secs(),
            threshold_secs = self.threshold_seconds,
            "Freshness poller starting"
        );

        let mut tick = interval_at(
            Instant::now() + self.interval_duration,
            self.interval_duration,
        );
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => {
                    tracing::info!("Freshness poller shutting down");
                    break;
                }

                _ = tick.tick() => {
                    match self.poll_once(&shutdown).await {
                        Ok(sites) => {
                            tracing::debug!(sites, "Freshness cycle complete");
                        }
                        Err(PollError::Cancelled) => {
                            tracing::debug!("Freshness fetch abandoned on shutdown");
                        }
                        Err(PollError::Parse { source, body }) => {
                            tracing::error!(
                                error = %source,
                                body = %body,
                                "Failed to parse freshness report"
                            );
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Freshness fetch error");
                        }
                    }
                }
            }
        }
    }
}
