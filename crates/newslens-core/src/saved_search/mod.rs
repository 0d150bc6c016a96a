//! Saved searches: the server-persisted list of terms the user can
//! re-invoke without retyping.

pub mod gateway;
pub mod model;

pub use gateway::SavedSearchGateway;
pub use model::SavedSearchTerm;
