//! newslens-core: domain layer of the newslens client.
//!
//! Holds the session state machine and the contracts of its collaborators
//! (credential storage, auth notifier, insight service, saved-search
//! gateway). Transport and persistence implementations live in the
//! `newslens-interaction` and `newslens-infrastructure` crates.

pub mod auth;
pub mod error;
pub mod insight;
pub mod saved_search;
pub mod session;

// Re-export common error type
pub use error::NewslensError;
