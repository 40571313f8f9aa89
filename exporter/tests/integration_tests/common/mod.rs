//! Common test utilities and helpers for integration tests.
//!
//! Provides an upstream API stub served on an ephemeral port, plus helpers to
//! build exporter components pointed at it.

use axum::{extract::State, routing::get, Router};
use exporter::{AppState, HttpFreshnessSource, PollConfig};
use shared::models::SiteFreshness;
use shared::storage::{FreshnessStore, StoreError};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Mutable behaviour of the upstream stub.
#[derive(Default)]
struct StubState {
    body: Mutex<String>,
    delay: Mutex<Duration>,
    hits: AtomicUsize,
}

/// A fake DTMS API serving `GET /freshness`.
#[derive(Clone)]
pub struct UpstreamStub {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl UpstreamStub {
    /// Starts the stub on `127.0.0.1:0`, initially serving an empty report.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        *state.body.lock().unwrap() = r#"{"sites": []}"#.to_string();

        let app = Router::new()
            .route("/freshness", get(freshness))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Base URL to use as `API_BASE_URL`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replaces the body returned by `/freshness`.
    pub fn set_body(&self, body: impl Into<String>) {
        *self.state.body.lock().unwrap() = body.into();
    }

    /// Sets a response delay, to exercise the fetch timeout.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// Number of `/freshness` requests received.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

async fn freshness(State(state): State<Arc<StubState>>) -> String {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    state.body.lock().unwrap().clone()
}

/// Poll configuration pointed at `stub`.
pub fn poll_config(stub: &UpstreamStub, interval: Duration) -> PollConfig {
    PollConfig {
        api_base_url: stub.base_url(),
        interval,
        freshness_threshold_secs: 300,
        fetch_timeout: Duration::from_secs(2),
    }
}

/// Real HTTP source pointed at `stub`.
pub fn http_source(config: &PollConfig) -> HttpFreshnessSource {
    HttpFreshnessSource::new(config).unwrap()
}

/// Fresh application state with an in-memory store.
pub fn test_state() -> AppState {
    AppState::with_in_memory_store()
}

/// Store whose every operation fails as if a writer had panicked.
pub struct PoisonedStore;

impl FreshnessStore for PoisonedStore {
    fn set(&self, _entry: SiteFreshness) -> Result<(), StoreError> {
        Err(StoreError::LockPoisoned)
    }

    fn get(&self, _site: &str) -> Result<Option<SiteFreshness>, StoreError> {
        Err(StoreError::LockPoisoned)
    }

    fn snapshot(&self) -> Result<Vec<SiteFreshness>, StoreError> {
        Err(StoreError::LockPoisoned)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Err(StoreError::LockPoisoned)
    }
}

/// Builds a `{"sites": [...]}` body from `(site, age_seconds)` pairs.
pub fn report(sites: &[(&str, f64)]) -> String {
    let sites: Vec<serde_json::Value> = sites
        .iter()
        .map(|(site, age)| {
            serde_json::json!({
                "site": site,
                "latest_timestamp": 1_765_000_000.0 - age,
                "age_seconds": age,
            })
        })
        .collect();
    serde_json::json!({ "sites": sites }).to_string()
}

/// GETs `path` from a running server and returns status and body text.
pub async fn get_text(addr: SocketAddr, path: &str) -> (u16, String) {
    let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

/// Polls `condition` every 20ms until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
