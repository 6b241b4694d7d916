//! The discovery run: one linear pass over the target.
//!
//! Launch browser → attach network capture → install hooks → navigate →
//! fixed waits → simulate interaction → harvest hooks → close browser →
//! report. Only launch and navigation failures abort the run; everything
//! observed up to an abort is discarded with the session.

use crate::browser::interact;
use crate::browser::BrowserSession;
use crate::capture::{listener, EndpointCollector};
use crate::core::config::DiscoveryConfig;
use crate::core::types::DiscoveryReport;
use crate::error::DiscoveryError;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

/// Drive a headless browser against `target` and collect API-like endpoints.
pub async fn discover_endpoints(
    target: &str,
    cfg: &DiscoveryConfig,
) -> Result<DiscoveryReport, DiscoveryError> {
    let target_url = parse_target(target)?;

    if cfg.preflight {
        preflight(&target_url).await;
    }

    let started = Instant::now();
    info!("🔍 Analyzing site: {}", target_url);

    let session = BrowserSession::launch(cfg).await?;
    let collector = EndpointCollector::new();
    let outcome = run_session(&session, &target_url, cfg, Arc::clone(&collector)).await;
    session.close().await;
    let elements_clicked = outcome?;

    let endpoints = collector.snapshot().await;
    let stats = collector.stats().await;
    info!(
        "✅ Discovery finished: {} endpoints from {} requests ({} JSON responses, {} hooked calls)",
        endpoints.len(),
        stats.requests_seen,
        stats.json_responses,
        stats.hooked_calls
    );

    Ok(DiscoveryReport {
        target: target.to_string(),
        endpoints,
        requests_seen: stats.requests_seen,
        json_responses: stats.json_responses,
        hooked_calls: stats.hooked_calls,
        elements_clicked,
        duration_ms: started.elapsed().as_millis() as u64,
        finished_at: Utc::now(),
    })
}

async fn run_session(
    session: &BrowserSession,
    target: &Url,
    cfg: &DiscoveryConfig,
    collector: Arc<EndpointCollector>,
) -> Result<usize, DiscoveryError> {
    let page = session.new_page().await?;

    // Capture and hooks must both be in place before the first navigation
    // byte moves, or early XHR traffic is lost.
    let handles = listener::attach(&page, Arc::clone(&collector)).await?;
    if let Err(e) = interact::install_hooks(&page).await {
        warn!("Hook install failed (non-fatal): {}", e);
    }

    info!("🌐 Navigating to {}", target);
    match tokio::time::timeout(cfg.nav_timeout, page.goto(target.as_str())).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            return Err(DiscoveryError::NavigationFailed {
                url: target.to_string(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(DiscoveryError::NavigationFailed {
                url: target.to_string(),
                reason: format!("timed out after {:?}", cfg.nav_timeout),
            })
        }
    }

    tokio::time::sleep(cfg.post_nav_wait).await;
    interact::wait_until_stable(&page, cfg.settle_quiet, cfg.settle_timeout).await;

    let clicked = interact::simulate_interaction(&page, cfg).await;
    tokio::time::sleep(cfg.post_interaction_wait).await;

    for call in interact::harvest_hooked_calls(&page).await {
        collector.record_hooked_call(target, &call).await;
    }

    handles.detach();
    Ok(clicked)
}

fn parse_target(target: &str) -> Result<Url, DiscoveryError> {
    let url = Url::parse(target).map_err(|e| DiscoveryError::InvalidTarget {
        url: target.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DiscoveryError::InvalidTarget {
            url: target.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Plain HTTP reachability check before paying for a browser launch.
/// Warn-only: sites that block non-browser clients still work in the
/// browser, so a preflight failure never stops the run.
async fn preflight(target: &Url) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!("Preflight client build failed: {}", e);
            return;
        }
    };
    match client.get(target.as_str()).send().await {
        Ok(resp) => info!("Preflight: {} responded {}", target, resp.status()),
        Err(e) => warn!(
            "⚠️ Preflight request failed ({}); continuing with browser anyway",
            e
        ),
    }
}
