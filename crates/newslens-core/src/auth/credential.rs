//! Credential holder and its persistence seam.
//!
//! The bearer token proving the user's identity is owned by a single
//! [`CredentialHolder`], which reads persisted storage once at construction
//! and caches the token in memory thereafter.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;

/// Persistence backend for the bearer token.
///
/// This trait decouples the credential holder from the specific storage
/// mechanism (a token file, an in-memory store in tests).
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Token files have appropriate permissions
/// - Tokens are never logged or exposed in error messages
pub trait CredentialStore: Send + Sync {
    /// Loads the persisted token, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))`: a token is persisted
    /// - `Ok(None)`: no token persisted
    /// - `Err(_)`: storage could not be read
    fn load(&self) -> Result<Option<String>>;

    /// Persists the token.
    fn store(&self, token: &str) -> Result<()>;

    /// Removes the persisted token.
    fn clear(&self) -> Result<()>;
}

/// Owns the bearer token for the current session.
///
/// The persisted store is read exactly once, at construction; afterwards the
/// in-memory copy is authoritative and storage is write-only. A storage
/// failure on the initial read is treated as an absent credential so the
/// client starts in the logged-out state instead of crashing.
pub struct CredentialHolder {
    store: Arc<dyn CredentialStore>,
    cached: RwLock<Option<String>>,
}

impl CredentialHolder {
    /// Creates a holder backed by the given store, reading it once.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let cached = match store.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("credential storage unavailable, starting logged out: {err}");
                None
            }
        };
        // An empty token is as good as no token.
        let cached = cached.filter(|token| !token.is_empty());
        Self {
            store,
            cached: RwLock::new(cached),
        }
    }

    /// Returns the current token, or `None` when logged out.
    pub fn get(&self) -> Option<String> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Stores a new token in memory and persists it.
    ///
    /// A persistence failure is logged; the in-memory token still takes
    /// effect for the current session.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if let Err(err) = self.store.store(&token) {
            tracing::warn!("failed to persist credential: {err}");
        }
        *self
            .cached
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Removes the token from memory and persisted storage.
    pub fn clear(&self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!("failed to clear persisted credential: {err}");
        }
        *self
            .cached
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}
