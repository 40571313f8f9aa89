//! Site freshness data model.
//!
//! Defines the upstream wire format of the `/freshness` endpoint and the
//! per-site freshness value published to scrapers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single site entry as reported by the upstream freshness endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Opaque site identifier.
    pub site: String,
    /// Unix timestamp (seconds) of the site's latest observed transfer.
    pub latest_timestamp: f64,
    /// Seconds elapsed since the latest transfer, computed upstream.
    pub age_seconds: f64,
}

/// Response body of `GET <base>/freshness`.
///
/// Unknown fields are ignored; missing or mistyped fields are a parse error.
///
/// # Example
///
/// ```
/// use shared::models::FreshnessReport;
///
/// let body = br#"{"sites":[{"site":"SITE_A","latest_timestamp":1765000000.0,"age_seconds":12.5}]}"#;
/// let report = FreshnessReport::from_slice(body).unwrap();
///
/// assert_eq!(report.sites.len(), 1);
/// assert_eq!(report.sites[0].site, "SITE_A");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreshnessReport {
    /// Per-site records. Order carries no meaning.
    pub sites: Vec<SiteRecord>,
}

impl FreshnessReport {
    /// Parses a report from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON or does not match the
    /// expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Last-known freshness of a single site.
///
/// `age_seconds` and `is_fresh` always come from the same upstream record and
/// are stored and read together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteFreshness {
    /// Opaque site identifier, unique key in the store.
    pub site: String,
    /// Seconds since the site's last transfer at fetch time.
    pub age_seconds: f64,
    /// Whether `age_seconds` is within the freshness threshold.
    pub is_fresh: bool,
    /// Upstream timestamp of the latest transfer.
    pub latest_timestamp: f64,
    /// When this value was recorded.
    pub updated_at: DateTime<Utc>,
}

impl SiteFreshness {
    /// Evaluates an upstream record against a freshness threshold.
    ///
    /// The threshold is inclusive: a site whose age equals the threshold is
    /// still fresh.
    ///
    /// # Example
    ///
    /// ```
    /// use shared::models::{SiteFreshness, SiteRecord};
    ///
    /// let record = SiteRecord {
    ///     site: "B".to_string(),
    ///     latest_timestamp: 0.0,
    ///     age_seconds: 300.0,
    /// };
    ///
    /// assert!(SiteFreshness::evaluate(&record, 300.0).is_fresh);
    /// ```
    #[must_use]
    pub fn evaluate(record: &SiteRecord, threshold_seconds: f64) -> Self {
        Self {
            site: record.site.clone(),
            age_seconds: record.age_seconds,
            is_fresh: record.age_seconds <= threshold_seconds,
            latest_timestamp: record.latest_timestamp,
            updated_at: Utc::now(),
        }
    }

    /// Returns the `dtms_data_fresh_ok` gauge value (1.0 or 0.0).
    #[must_use]
    pub fn ok_value(&self) -> f64 {
        if self.is_fresh {
            1.0
        } else {
            0.0
        }
    }
}
