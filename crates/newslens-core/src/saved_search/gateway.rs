//! Saved-search gateway trait.
//!
//! Defines the interface to the remote saved-search store.

use async_trait::async_trait;

use crate::error::Result;
use crate::saved_search::SavedSearchTerm;

/// An abstract gateway over the remote saved-search list.
///
/// This trait defines the contract for listing, creating and deleting saved
/// search terms, decoupling the session controller from the HTTP transport.
///
/// All three operations require a valid credential; calling without one is a
/// programming error in the caller, signaled as `AuthRequired` and never
/// silently ignored. The gateway performs no duplicate checking of its own;
/// pre-checking duplicates is the session controller's responsibility.
#[async_trait]
pub trait SavedSearchGateway: Send + Sync {
    /// Lists all saved search terms for the current user.
    ///
    /// Full replace semantics for the caller; no pagination.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<SavedSearchTerm>)`: the complete current list
    /// - `Err(_)`: error occurred during retrieval
    async fn list(&self) -> Result<Vec<SavedSearchTerm>>;

    /// Creates a new saved search term.
    ///
    /// # Arguments
    ///
    /// * `term` - The term text; the server assigns identity and timestamp
    ///
    /// # Returns
    ///
    /// - `Ok(SavedSearchTerm)`: the server-assigned record
    /// - `Err(Conflict)`: the term already exists for this user
    /// - `Err(_)`: error occurred during creation
    async fn create(&self, term: &str) -> Result<SavedSearchTerm>;

    /// Deletes a saved search term by identity.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: deleted
    /// - `Err(NotFound)`: no such term
    /// - `Err(_)`: error occurred during deletion
    async fn delete(&self, id: &str) -> Result<()>;
}
