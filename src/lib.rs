pub mod browser;
pub mod capture;
pub mod core;
pub mod discover;
pub mod error;
pub mod loadtest;

// --- Primary exports ---
pub use browser::browser_available;
pub use core::config::DiscoveryConfig;
pub use core::types::{DiscoveryReport, Endpoint, HookedCall, LoadTestPlan};
pub use discover::discover_endpoints;
pub use error::DiscoveryError;
pub use loadtest::{plan_from_report, PlanOptions};
