//! Insight service trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::insight::Insight;

/// Number of insights requested per search unless the caller overrides it.
pub const DEFAULT_NUM_RESULTS: u32 = 5;

/// Service producing insights for a search term.
///
/// One request per call; no retry, no caching, no batching. The term is
/// passed verbatim: rejecting empty or whitespace-only terms is the caller's
/// responsibility, not the service's.
#[async_trait]
pub trait InsightService: Send + Sync {
    /// Fetches an ordered list of insights for the given term.
    ///
    /// # Arguments
    /// * `term` - The search term, passed verbatim
    /// * `num_results` - How many insights to request
    ///
    /// # Errors
    ///
    /// `Request` when the remote responds with a failure status, `Network`
    /// when the transport fails.
    async fn fetch_insights(&self, term: &str, num_results: u32) -> Result<Vec<Insight>>;
}
