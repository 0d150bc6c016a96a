//! newslens-interaction: HTTP clients for the backend services.
//!
//! Implements the `newslens-core` service traits over reqwest: the insights
//! endpoint, the saved-search store and the auth service.

pub mod auth_client;
pub mod config;
pub mod dto;
mod http;
pub mod insights_client;
pub mod search_terms_client;

pub use auth_client::AuthApiClient;
pub use config::ApiConfig;
pub use dto::TokenResponse;
pub use insights_client::InsightsApiClient;
pub use search_terms_client::SearchTermsApiClient;
