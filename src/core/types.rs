use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One observed API-like call: an HTTP method plus a URL path.
///
/// Two captures are the same endpoint when both fields match. Query strings
/// and fragments are stripped before an `Endpoint` is constructed, so
/// `/api/users?page=2` and `/api/users?page=3` collapse into one entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
}

impl Endpoint {
    /// Method is normalized to uppercase so `get` and `GET` dedup together.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A `fetch()` / `XMLHttpRequest` call recorded by the instrumentation hooks
/// injected into the page (see `browser::interact::HOOK_SCRIPT`).
///
/// The `url` may be relative — it is resolved against the page URL when fed
/// into the collector.
#[derive(Clone, Debug, Deserialize)]
pub struct HookedCall {
    pub method: String,
    pub url: String,
}

/// Summary of one discovery run against a target.
#[derive(Clone, Debug, Serialize)]
pub struct DiscoveryReport {
    pub target: String,
    /// Deduplicated endpoints, sorted by path then method.
    pub endpoints: Vec<Endpoint>,
    /// Total CDP `requestWillBeSent` events observed.
    pub requests_seen: usize,
    /// Responses with an `application/json` MIME type.
    pub json_responses: usize,
    /// Calls captured by the in-page fetch/XHR hooks.
    pub hooked_calls: usize,
    /// Elements clicked during interaction simulation.
    pub elements_clicked: usize,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
}

/// Load-test plan handed off to the load-test runner.
///
/// Field names follow the runner's wire format (`pathList` camelCase), so
/// the emitted JSON can be POSTed to it unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadTestPlan {
    pub target: String,
    pub path_list: Vec<String>,
    pub rps: u32,
    pub duration: u32,
    pub method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_method_normalized() {
        let a = Endpoint::new("get", "/api/users");
        let b = Endpoint::new("GET", "/api/users");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "GET /api/users");
    }

    #[test]
    fn plan_serializes_with_runner_field_names() {
        let plan = LoadTestPlan {
            target: "https://example.com".to_string(),
            path_list: vec!["/api/users".to_string()],
            rps: 10,
            duration: 10,
            method: "GET".to_string(),
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("pathList").is_some(), "expected camelCase pathList");
        assert!(json.get("path_list").is_none());
        assert_eq!(json["rps"], 10);
    }
}
