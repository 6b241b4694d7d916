//! End-to-end capture → classify → plan pipeline, fed with synthetic CDP
//! traffic so no browser is needed.

use api_scout::capture::EndpointCollector;
use api_scout::core::types::{DiscoveryReport, HookedCall};
use api_scout::loadtest::{plan_from_report, PlanOptions};
use api_scout::Endpoint;
use chrono::Utc;
use url::Url;

#[tokio::test]
async fn synthetic_page_load_produces_a_usable_plan() {
    let collector = EndpointCollector::new();
    let page_url = Url::parse("https://shop.example.com/app").unwrap();

    // Document + static assets, as a real page load would emit them.
    collector
        .record_request("1", "GET", "https://shop.example.com/app")
        .await;
    collector
        .record_request("2", "GET", "https://shop.example.com/assets/app.js")
        .await;
    collector
        .record_request("3", "GET", "https://shop.example.com/assets/app.css")
        .await;
    collector
        .record_request("4", "GET", "https://shop.example.com/img/hero.png")
        .await;

    // XHR traffic triggered during load.
    collector
        .record_request("5", "GET", "https://shop.example.com/api/products?limit=20")
        .await;
    collector
        .record_response(
            "5",
            "https://shop.example.com/api/products?limit=20",
            "application/json; charset=utf-8",
        )
        .await;
    collector
        .record_request("6", "POST", "https://shop.example.com/graphql")
        .await;

    // Analytics noise that must not leak into the plan.
    collector
        .record_request("7", "POST", "https://www.google-analytics.com/g/collect")
        .await;

    // A call only the in-page hooks saw, with a relative URL.
    collector
        .record_hooked_call(
            &page_url,
            &HookedCall {
                method: "GET".to_string(),
                url: "/v1/recommendations".to_string(),
            },
        )
        .await;

    let endpoints = collector.snapshot().await;
    let stats = collector.stats().await;

    assert!(endpoints.contains(&Endpoint::new("GET", "/app")));
    assert!(endpoints.contains(&Endpoint::new("GET", "/api/products")));
    assert!(endpoints.contains(&Endpoint::new("POST", "/graphql")));
    assert!(endpoints.contains(&Endpoint::new("GET", "/v1/recommendations")));
    assert!(!endpoints.iter().any(|e| e.path.contains("assets")));
    assert!(!endpoints.iter().any(|e| e.path.contains("collect")));
    assert_eq!(stats.requests_seen, 7);
    assert_eq!(stats.json_responses, 1);
    assert_eq!(stats.hooked_calls, 1);

    let report = DiscoveryReport {
        target: "https://shop.example.com/app".to_string(),
        endpoints,
        requests_seen: stats.requests_seen,
        json_responses: stats.json_responses,
        hooked_calls: stats.hooked_calls,
        elements_clicked: 0,
        duration_ms: 42,
        finished_at: Utc::now(),
    };

    let plan = plan_from_report(&report, &PlanOptions::default());
    assert_eq!(plan.target, "https://shop.example.com/app");
    assert_eq!(plan.method, "GET");
    assert!(plan.path_list.contains(&"/api/products".to_string()));
    assert!(plan.path_list.contains(&"/v1/recommendations".to_string()));
    // POST-only endpoint stays out of a GET plan.
    assert!(!plan.path_list.contains(&"/graphql".to_string()));

    // Wire format the runner expects.
    let json = serde_json::to_value(&plan).unwrap();
    assert!(json.get("pathList").is_some());
    assert_eq!(json["rps"], 10);
    assert_eq!(json["duration"], 10);
}
