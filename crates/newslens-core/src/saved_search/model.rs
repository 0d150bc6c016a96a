//! Saved search term domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted, user-owned search term.
///
/// Identity and timestamp are assigned by the server; the client never
/// fabricates either. The in-memory list held by the session is the single
/// source of truth for display until the next full reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearchTerm {
    /// Server-assigned identity.
    pub id: String,
    /// The search term text. Non-empty.
    pub term: String,
    /// Owner, implicit from the credential used to create the term.
    pub user_id: String,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}
