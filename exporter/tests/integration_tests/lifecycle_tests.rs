//! Integration tests for the full serve path.
//!
//! Tests cover:
//! - Background polling feeding a live `/metrics` endpoint
//! - Shutdown cancelling the poller and stopping the listener
//! - Stale values surviving an upstream outage

use exporter::{serve, Poller, PollerTask};
use shared::storage::FreshnessStore;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::common::{
    get_text, http_source, poll_config, report, test_state, wait_until, UpstreamStub,
};

#[tokio::test]
async fn test_poller_feeds_live_scrape_endpoint_until_shutdown() {
    let stub = UpstreamStub::start().await;
    stub.set_body(report(&[("SITE_A", 12.0), ("SITE_B", 900.0)]));

    let config = poll_config(&stub, Duration::from_millis(100));
    let state = test_state();
    let poller = PollerTask::spawn(Poller::new(
        http_source(&config),
        state.shared_store(),
        &config,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, state.clone(), poller, async move {
        let _ = shutdown_rx.await;
    }));

    let store = state.shared_store();
    assert!(
        wait_until(Duration::from_secs(5), || store.len().unwrap_or(0) == 2).await,
        "poller never published"
    );

    let (status, body) = get_text(addr, "/metrics").await;
    assert_eq!(status, 200);
    assert!(body.contains("# TYPE dtms_data_fresh_seconds gauge"));
    assert!(body.contains("dtms_data_fresh_ok{site=\"SITE_A\"} 1"));
    assert!(body.contains("dtms_data_fresh_ok{site=\"SITE_B\"} 0"));

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not shut down")
        .unwrap()
        .unwrap();

    let hits_after_shutdown = stub.hits();
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(stub.hits(), hits_after_shutdown);

    assert!(reqwest::get(format!("http://{addr}/metrics")).await.is_err());
}

#[tokio::test]
async fn test_upstream_outage_leaves_metrics_stale_not_blank() {
    let stub = UpstreamStub::start().await;
    stub.set_body(report(&[("SITE_A", 12.0)]));

    let config = poll_config(&stub, Duration::from_millis(100));
    let state = test_state();
    let poller = PollerTask::spawn(Poller::new(
        http_source(&config),
        state.shared_store(),
        &config,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, state.clone(), poller, async move {
        let _ = shutdown_rx.await;
    }));

    let store = state.shared_store();
    assert!(wait_until(Duration::from_secs(5), || store.len().unwrap_or(0) == 1).await);

    stub.set_body("<html>502 Bad Gateway</html>");
    let hits = stub.hits();
    assert!(wait_until(Duration::from_secs(5), || stub.hits() >= hits + 2).await);

    let (status, body) = get_text(addr, "/metrics").await;
    assert_eq!(status, 200);
    assert!(body.contains("dtms_data_fresh_seconds{site=\"SITE_A\"} 12"));

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
