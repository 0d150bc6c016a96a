//! Error types for the newslens client.

use thiserror::Error;

/// A shared error type for the newslens crates.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum NewslensError {
    /// An operation requiring a credential was attempted without one.
    ///
    /// The session state machine gates every such operation, so hitting this
    /// variant indicates a bug in the caller rather than a user-facing
    /// condition.
    #[error("Authentication required")]
    AuthRequired,

    /// Transport failure: the remote never produced a response.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The remote responded with a failure status.
    #[error("Request failed with status {status}: {detail}")]
    Request { status: u16, detail: String },

    /// Entity not found error with type information.
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Duplicate create of a saved search term.
    #[error("Search term already saved: '{term}'")]
    Conflict { term: String },

    /// Local persisted storage failure.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "form", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NewslensError {
    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a Request error.
    pub fn request(status: u16, detail: impl Into<String>) -> Self {
        Self::Request {
            status,
            detail: detail.into(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(term: impl Into<String>) -> Self {
        Self::Conflict { term: term.into() }
    }

    /// Creates a Storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an AuthRequired error.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }

    /// Check if this is a Network error.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<std::io::Error> for NewslensError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for NewslensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, NewslensError>`.
pub type Result<T> = std::result::Result<T, NewslensError>;
