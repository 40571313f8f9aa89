//! Freshness storage trait and implementations.
//!
//! Provides the `FreshnessStore` trait for the per-site metric state shared
//! between the poller (single writer) and scrape handlers (readers), and an
//! `InMemoryFreshnessStore` implementation.

use crate::models::SiteFreshness;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during freshness store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock.
    #[error("Freshness store lock poisoned")]
    LockPoisoned,
}

/// Trait for freshness storage implementations.
///
/// Each site maps to exactly one [`SiteFreshness`]. Entries are upserted and
/// never evicted. Implementations must be thread-safe (Send + Sync) and must
/// never expose a partially written entry.
pub trait FreshnessStore: Send + Sync {
    /// Inserts or replaces the entry for `entry.site`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn set(&self, entry: SiteFreshness) -> Result<(), StoreError>;

    /// Returns the current entry for a site, if one was ever recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, site: &str) -> Result<Option<SiteFreshness>, StoreError>;

    /// Returns a copy of every entry, ordered by site identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn snapshot(&self) -> Result<Vec<SiteFreshness>, StoreError>;

    /// Returns the number of known sites.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn len(&self) -> Result<usize, StoreError>;

    /// Returns true if no site has been recorded yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// In-memory freshness store backed by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryFreshnessStore {
    sites: Arc<RwLock<BTreeMap<String, SiteFreshness>>>,
}

impl InMemoryFreshnessStore {
    /// Creates a new empty in-memory freshness store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sites: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Creates a new in-memory freshness store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl FreshnessStore for InMemoryFreshnessStore {
    fn set(&self, entry: SiteFreshness) -> Result<(), StoreError> {
        let mut sites = self.sites.write().map_err(|_| StoreError::LockPoisoned)?;
        sites.insert(entry.site.clone(), entry);
        Ok(())
    }

    fn get(&self, site: &str) -> Result<Option<SiteFreshness>, StoreError> {
        let sites = self.sites.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(sites.get(site).cloned())
    }

    fn snapshot(&self) -> Result<Vec<SiteFreshness>, StoreError> {
        let sites = self.sites.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(sites.values().cloned().collect())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let sites = self.sites.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(sites.len())
    }
}
