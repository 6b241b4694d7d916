pub mod classify;
pub mod collector;
pub mod listener;

pub use collector::{CollectorStats, EndpointCollector};
