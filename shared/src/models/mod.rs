//! Data models for the DTMS freshness exporter.
//!
//! This module contains the upstream wire format and the per-site freshness
//! values published as metrics.

pub mod freshness;

pub use freshness::{FreshnessReport, SiteFreshness, SiteRecord};
