//! Live-browser smoke test. Skips gracefully when no Chromium-family
//! browser is installed, and tolerates network flakiness — the assertions
//! only run on a successful pass.

use api_scout::{browser_available, discover_endpoints, DiscoveryConfig};
use std::time::Duration;

fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn discovery_runs_against_a_live_page() {
    init_logger();
    if !browser_available() {
        eprintln!("⏭️  no Chromium-family browser installed; skipping");
        return;
    }

    let cfg = DiscoveryConfig {
        post_nav_wait: Duration::from_millis(1000),
        post_interaction_wait: Duration::from_millis(500),
        max_clicks: 2,
        preflight: false,
        ..DiscoveryConfig::default()
    };

    match discover_endpoints("https://httpbin.org/html", &cfg).await {
        Ok(report) => {
            println!("🧪 requests_seen: {}", report.requests_seen);
            println!("🧪 endpoints: {:?}", report.endpoints);
            assert!(
                report.requests_seen >= 1,
                "expected at least the document request to be captured"
            );
            assert!(report.duration_ms > 0);
        }
        Err(e) => {
            // Live-network test: log, don't fail the suite on flakiness.
            tracing::warn!("live discovery failed: {}", e);
        }
    }
}

#[test]
fn invalid_target_fails_before_any_browser_work() {
    init_logger();
    let cfg = DiscoveryConfig::default();
    let err = tokio_test::block_on(discover_endpoints("nonsense", &cfg));
    assert!(err.is_err());
}
