//! The shared in-memory endpoint set fed by the CDP listeners and the
//! in-page hooks.

use crate::capture::classify;
use crate::core::types::{Endpoint, HookedCall};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

/// Counters for the discovery report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectorStats {
    pub requests_seen: usize,
    pub json_responses: usize,
    pub hooked_calls: usize,
}

#[derive(Default)]
struct CollectorState {
    endpoints: HashSet<Endpoint>,
    // CDP request id -> HTTP method, so a JSON response can be attributed
    // to the method of the request that produced it.
    methods_by_request: HashMap<String, String>,
    stats: CollectorStats,
}

/// Deduplicating endpoint set.
///
/// Three feeds write into it: `requestWillBeSent` events (path heuristics),
/// `responseReceived` events (`application/json` responses are admitted
/// unconditionally), and harvested fetch/XHR hook calls. Membership is
/// unique per `(method, path)` no matter how often or through which channel
/// an endpoint was observed.
pub struct EndpointCollector {
    inner: Mutex<CollectorState>,
}

impl EndpointCollector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(CollectorState::default()),
        })
    }

    /// Feed one `Network.requestWillBeSent` event.
    pub async fn record_request(&self, request_id: &str, method: &str, url: &str) {
        let mut state = self.inner.lock().await;
        state.stats.requests_seen += 1;
        state
            .methods_by_request
            .insert(request_id.to_string(), method.to_ascii_uppercase());

        let Some(path) = request_path(url) else {
            debug!("skipping unparseable request URL: {}", url);
            return;
        };
        if classify::is_tracker_url(url) {
            debug!("skipping tracker request: {}", url);
            return;
        }
        if classify::is_api_like(&path) {
            state.endpoints.insert(Endpoint::new(method, path));
        }
    }

    /// Feed one `Network.responseReceived` event. JSON responses are strong
    /// API evidence, so they bypass the path heuristics entirely.
    pub async fn record_response(&self, request_id: &str, url: &str, mime_type: &str) {
        if !mime_type.contains("application/json") {
            return;
        }
        let mut state = self.inner.lock().await;
        state.stats.json_responses += 1;

        let Some(path) = request_path(url) else {
            debug!("skipping unparseable response URL: {}", url);
            return;
        };
        if classify::is_tracker_url(url) {
            return;
        }
        let method = state
            .methods_by_request
            .get(request_id)
            .cloned()
            .unwrap_or_else(|| "GET".to_string());
        state.endpoints.insert(Endpoint::new(method, path));
    }

    /// Feed one call harvested from the in-page fetch/XHR hooks. Relative
    /// URLs are resolved against the page URL.
    pub async fn record_hooked_call(&self, base: &Url, call: &HookedCall) {
        let mut state = self.inner.lock().await;
        state.stats.hooked_calls += 1;

        let resolved = match Url::parse(&call.url).or_else(|_| base.join(&call.url)) {
            Ok(u) => u,
            Err(e) => {
                debug!("skipping unresolvable hooked URL '{}': {}", call.url, e);
                return;
            }
        };
        if classify::is_tracker_url(resolved.as_str()) {
            return;
        }
        let path = resolved.path().to_string();
        if classify::is_api_like(&path) {
            state.endpoints.insert(Endpoint::new(call.method.as_str(), path));
        }
    }

    /// Sorted copy of the endpoint set (path, then method).
    pub async fn snapshot(&self) -> Vec<Endpoint> {
        let state = self.inner.lock().await;
        let mut endpoints: Vec<Endpoint> = state.endpoints.iter().cloned().collect();
        endpoints.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
        endpoints
    }

    pub async fn stats(&self) -> CollectorStats {
        self.inner.lock().await.stats
    }
}

fn request_path(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| u.path().to_string())
}
