//! Shape a discovery report into a load-test plan.
//!
//! The plan is not derived from observed traffic characteristics — rps,
//! duration, and method are fixed defaults the operator can override.

use crate::core::types::{DiscoveryReport, LoadTestPlan};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub const DEFAULT_RPS: u32 = 10;
pub const DEFAULT_DURATION_SECS: u32 = 10;
pub const DEFAULT_METHOD: &str = "GET";

/// Operator knobs for the emitted plan.
#[derive(Clone, Debug)]
pub struct PlanOptions {
    pub rps: u32,
    pub duration: u32,
    pub method: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            rps: DEFAULT_RPS,
            duration: DEFAULT_DURATION_SECS,
            method: DEFAULT_METHOD.to_string(),
        }
    }
}

/// Build a plan from the endpoints matching the plan method. When none
/// match, fall back to hammering the document root — the runner requires a
/// non-empty path list.
pub fn plan_from_report(report: &DiscoveryReport, opts: &PlanOptions) -> LoadTestPlan {
    let method = opts.method.to_ascii_uppercase();
    let mut path_list: Vec<String> = report
        .endpoints
        .iter()
        .filter(|e| e.method == method)
        .map(|e| e.path.clone())
        .collect();

    if path_list.is_empty() {
        path_list.push("/".to_string());
    }

    LoadTestPlan {
        target: report.target.clone(),
        path_list,
        rps: opts.rps,
        duration: opts.duration,
        method,
    }
}

/// Persist the plan as pretty-printed JSON, ready to POST to the runner.
pub fn write_plan(plan: &LoadTestPlan, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).context("serializing load-test plan")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing load-test plan to {}", path.display()))?;
    info!("💾 Load-test plan written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Endpoint;
    use chrono::Utc;

    fn report_with(endpoints: Vec<Endpoint>) -> DiscoveryReport {
        DiscoveryReport {
            target: "https://example.com".to_string(),
            endpoints,
            requests_seen: 0,
            json_responses: 0,
            hooked_calls: 0,
            elements_clicked: 0,
            duration_ms: 0,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn plan_keeps_only_matching_method() {
        let report = report_with(vec![
            Endpoint::new("GET", "/api/users"),
            Endpoint::new("POST", "/api/users"),
            Endpoint::new("GET", "/api/orders"),
        ]);
        let plan = plan_from_report(&report, &PlanOptions::default());
        assert_eq!(plan.path_list, vec!["/api/users", "/api/orders"]);
        assert_eq!(plan.method, "GET");
        assert_eq!(plan.rps, DEFAULT_RPS);
        assert_eq!(plan.duration, DEFAULT_DURATION_SECS);
    }

    #[test]
    fn empty_match_falls_back_to_root() {
        let report = report_with(vec![Endpoint::new("POST", "/api/login")]);
        let plan = plan_from_report(&report, &PlanOptions::default());
        assert_eq!(plan.path_list, vec!["/"]);
    }

    #[test]
    fn method_option_is_case_insensitive() {
        let report = report_with(vec![Endpoint::new("POST", "/api/login")]);
        let opts = PlanOptions {
            method: "post".to_string(),
            ..Default::default()
        };
        let plan = plan_from_report(&report, &opts);
        assert_eq!(plan.path_list, vec!["/api/login"]);
        assert_eq!(plan.method, "POST");
    }

    #[test]
    fn write_plan_round_trips() {
        let report = report_with(vec![Endpoint::new("GET", "/api/users")]);
        let plan = plan_from_report(&report, &PlanOptions::default());

        let path = std::env::temp_dir().join(format!("api-scout-plan-{}.json", std::process::id()));
        write_plan(&plan, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: LoadTestPlan = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, plan);
        assert!(raw.contains("\"pathList\""));
        let _ = std::fs::remove_file(&path);
    }
}
