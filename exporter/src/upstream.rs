//! Upstream freshness source.
//!
//! The [`FreshnessSource`] trait abstracts the transport to the upstream API so
//! the poller can be driven by a scripted source in tests. [`HttpFreshnessSource`]
//! fetches `GET <base>/freshness` via `reqwest`.

use std::future::Future;

use crate::config::PollConfig;
use crate::error::PollError;

/// Trait for fetching the raw freshness report body.
///
/// Implementations return the body bytes untouched; parsing is done by the
/// poller so a malformed body can be logged verbatim.
pub trait FreshnessSource: Send + Sync {
    /// Fetch the current freshness report body.
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, PollError>> + Send;
}

/// HTTP source for the upstream freshness endpoint.
///
/// Uses a reusable `reqwest::Client` with connection pooling and a fixed
/// per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFreshnessSource {
    http: reqwest::Client,
    url: String,
}

impl HttpFreshnessSource {
    /// Create a source for `<config.api_base_url>/freshness`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialisation failure).
    pub fn new(config: &PollConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            http,
            url: config.freshness_url(),
        })
    }
}

impl FreshnessSource for HttpFreshnessSource {
    async fn fetch(&self) -> Result<Vec<u8>, PollError> {
        let response = self.http.get(&self.url).send().await?;

        // The status is not inspected: an error page fails to parse instead.
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(
            url = %self.url,
            status = status.as_u16(),
            bytes = bytes.len(),
            "Freshness report fetched"
        );

        Ok(bytes.to_vec())
    }
}
