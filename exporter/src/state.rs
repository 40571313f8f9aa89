//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::storage::{FreshnessStore, InMemoryFreshnessStore};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds the freshness store the poller writes into. Handlers only read it.
#[derive(Clone)]
pub struct AppState {
    /// The freshness storage backend.
    store: Arc<dyn FreshnessStore>,
}

impl AppState {
    /// Creates a new application state with the given store.
    pub fn new(store: Arc<dyn FreshnessStore>) -> Self {
        Self { store }
    }

    /// Creates a new application state with an in-memory store.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self {
            store: Arc::new(InMemoryFreshnessStore::new()),
        }
    }

    /// Returns a reference to the freshness store.
    #[must_use]
    pub fn store(&self) -> &dyn FreshnessStore {
        self.store.as_ref()
    }

    /// Returns a shared handle to the freshness store, for the poller.
    #[must_use]
    pub fn shared_store(&self) -> Arc<dyn FreshnessStore> {
        Arc::clone(&self.store)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
