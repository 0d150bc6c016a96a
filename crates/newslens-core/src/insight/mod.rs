//! Insights: the per-search records returned by the backend.

pub mod model;
pub mod service;

pub use model::Insight;
pub use service::{DEFAULT_NUM_RESULTS, InsightService};
