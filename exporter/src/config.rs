//! Exporter configuration module.
//!
//! Handles loading configuration from environment variables with defaults.
//! Malformed numeric values never fail startup; they fall back to the default
//! and a warning is logged.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Default upstream API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://dtms-api:8003";
/// Default scrape listener port.
pub const DEFAULT_PORT: u16 = 8004;
/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
/// Default freshness threshold in seconds.
pub const DEFAULT_FRESHNESS_THRESHOLD_SECS: i64 = 300;
/// Per-request timeout for the upstream fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_HOST: &str = "0.0.0.0";

/// Poll loop configuration. Immutable once the poller is built.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Base URL of the upstream API, without the `/freshness` path.
    pub api_base_url: String,
    /// Time between fetch cycles. The first fetch happens one interval after start.
    pub interval: Duration,
    /// Maximum age in seconds for a site to count as fresh (inclusive).
    /// A negative threshold marks every site stale.
    pub freshness_threshold_secs: i64,
    /// Timeout for a single upstream request.
    pub fetch_timeout: Duration,
}

impl PollConfig {
    /// Returns the full URL of the upstream freshness endpoint.
    #[must_use]
    pub fn freshness_url(&self) -> String {
        format!("{}/freshness", self.api_base_url.trim_end_matches('/'))
    }

    /// Returns the freshness threshold as floating-point seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn threshold_seconds(&self) -> f64 {
        self.freshness_threshold_secs as f64
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            freshness_threshold_secs: DEFAULT_FRESHNESS_THRESHOLD_SECS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Exporter configuration.
///
/// Configuration values can be set via environment variables:
/// - `API_BASE_URL`: Upstream API base URL (default: `http://dtms-api:8003`)
/// - `PORT`: The scrape port to listen on (default: 8004)
/// - `POLL_INTERVAL_SECONDS`: Seconds between polls (default: 30)
/// - `FRESHNESS_THRESHOLD_SECONDS`: Freshness threshold (default: 300)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Poll loop settings.
    pub poll: PollConfig,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// Never fails: unset, empty, or unparsable values use their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let port = parse_or("PORT", lookup("PORT").as_deref(), DEFAULT_PORT);

        let interval_secs = parse_or(
            "POLL_INTERVAL_SECONDS",
            lookup("POLL_INTERVAL_SECONDS").as_deref(),
            DEFAULT_POLL_INTERVAL_SECS,
        );
        // A zero period would make the ticker spin.
        let interval_secs = if interval_secs == 0 {
            tracing::warn!(
                key = "POLL_INTERVAL_SECONDS",
                default = DEFAULT_POLL_INTERVAL_SECS,
                "Poll interval must be positive, using default"
            );
            DEFAULT_POLL_INTERVAL_SECS
        } else {
            interval_secs
        };

        let freshness_threshold_secs = parse_or(
            "FRESHNESS_THRESHOLD_SECONDS",
            lookup("FRESHNESS_THRESHOLD_SECONDS").as_deref(),
            DEFAULT_FRESHNESS_THRESHOLD_SECS,
        );

        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            poll: PollConfig {
                api_base_url,
                interval: Duration::from_secs(interval_secs),
                freshness_threshold_secs,
                fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            },
        }
    }

    /// Returns the socket address for binding.
    ///
    /// Falls back to all interfaces if `host` is not an IP address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            poll: PollConfig::default(),
        }
    }
}

/// Parses an optional raw value, falling back to `default` when the value is
/// unset, empty, or malformed.
fn parse_or<T>(key: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw.map(str::trim) {
        None | Some("") => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value, %default, "Invalid integer value, using default");
            default
        }),
    }
}
