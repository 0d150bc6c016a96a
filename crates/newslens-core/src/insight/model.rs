//! Insight domain model.

use serde::{Deserialize, Serialize};

/// One AI-generated insight for a search term.
///
/// Immutable and never persisted locally; always fetched fresh per tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// The insight text itself.
    pub text: String,
    /// Title of the article the insight was derived from.
    pub source_title: String,
    /// Link to the source article.
    pub source_link: String,
}
