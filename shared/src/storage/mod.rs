//! Storage traits and implementations.
//!
//! This module provides the abstraction for the per-site freshness state that
//! the poller writes and the scrape handler reads. The `FreshnessStore` trait
//! allows alternative implementations; `InMemoryFreshnessStore` is the one the
//! exporter uses.

pub mod freshness_store;

pub use freshness_store::{FreshnessStore, InMemoryFreshnessStore, StoreError};
