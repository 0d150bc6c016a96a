//! HTTP client for the saved-search store.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use newslens_core::NewslensError;
use newslens_core::auth::CredentialHolder;
use newslens_core::error::Result;
use newslens_core::saved_search::{SavedSearchGateway, SavedSearchTerm};

use crate::config::ApiConfig;
use crate::dto::{CreateSearchTermRequest, SearchTermDto};
use crate::http::{decode_error, network_error, response_error};

/// Talks to the `/search-terms/` endpoints.
///
/// Every operation requires a credential; calling without one is a
/// programming error in the caller and surfaces as `AuthRequired`.
#[derive(Clone)]
pub struct SearchTermsApiClient {
    client: Client,
    config: ApiConfig,
    credentials: Arc<CredentialHolder>,
}

impl SearchTermsApiClient {
    pub fn new(config: ApiConfig, credentials: Arc<CredentialHolder>) -> Self {
        Self {
            client: Client::new(),
            config,
            credentials,
        }
    }

    fn bearer(&self) -> Result<String> {
        self.credentials.get().ok_or(NewslensError::AuthRequired)
    }
}

#[async_trait]
impl SavedSearchGateway for SearchTermsApiClient {
    async fn list(&self) -> Result<Vec<SavedSearchTerm>> {
        let response = self
            .client
            .get(self.config.endpoint("/search-terms/"))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(network_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let terms: Vec<SearchTermDto> = response.json().await.map_err(decode_error)?;
        Ok(terms.into_iter().map(SavedSearchTerm::from).collect())
    }

    async fn create(&self, term: &str) -> Result<SavedSearchTerm> {
        let response = self
            .client
            .post(self.config.endpoint("/search-terms/"))
            .bearer_auth(self.bearer()?)
            .json(&CreateSearchTermRequest { term })
            .send()
            .await
            .map_err(network_error)?;
        if response.status() == StatusCode::CONFLICT {
            return Err(NewslensError::conflict(term));
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let dto: SearchTermDto = response.json().await.map_err(decode_error)?;
        Ok(dto.into())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.config.endpoint(&format!("/search-terms/{id}")))
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(network_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(NewslensError::not_found("search term", id));
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }
}
