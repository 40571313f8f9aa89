//! API route definitions.
//!
//! This module organizes all HTTP routes for the freshness exporter.

mod metrics;

pub use metrics::metrics_routes;
