//! DTMS Freshness Shared Library
//!
//! This crate contains the freshness models and metric state storage used by
//! the DTMS freshness exporter.
//!
//! # Modules
//!
//! - [`models`] - Upstream wire format and per-site freshness values
//! - [`storage`] - Freshness store trait and in-memory implementation
//!
//! # Example
//!
//! ```
//! use shared::models::{SiteFreshness, SiteRecord};
//! use shared::storage::{FreshnessStore, InMemoryFreshnessStore};
//!
//! let store = InMemoryFreshnessStore::new();
//! let record = SiteRecord {
//!     site: "SITE_A".to_string(),
//!     latest_timestamp: 1_765_000_000.0,
//!     age_seconds: 42.0,
//! };
//! store.set(SiteFreshness::evaluate(&record, 300.0)).unwrap();
//!
//! assert!(store.get("SITE_A").unwrap().unwrap().is_fresh);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
