//! HTTP client for the insights endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use newslens_core::auth::CredentialHolder;
use newslens_core::error::Result;
use newslens_core::insight::{Insight, InsightService};

use crate::config::ApiConfig;
use crate::dto::{InsightDto, InsightRequest};
use crate::http::{decode_error, network_error, response_error};

/// Talks to `POST /api/insights`.
///
/// The endpoint accepts anonymous requests; the bearer header is attached
/// only when a credential happens to be present.
#[derive(Clone)]
pub struct InsightsApiClient {
    client: Client,
    config: ApiConfig,
    credentials: Arc<CredentialHolder>,
}

impl InsightsApiClient {
    pub fn new(config: ApiConfig, credentials: Arc<CredentialHolder>) -> Self {
        Self {
            client: Client::new(),
            config,
            credentials,
        }
    }
}

#[async_trait]
impl InsightService for InsightsApiClient {
    async fn fetch_insights(&self, term: &str, num_results: u32) -> Result<Vec<Insight>> {
        let mut request = self
            .client
            .post(self.config.endpoint("/api/insights"))
            .json(&InsightRequest {
                search_term: term,
                num_results,
            });
        if let Some(token) = self.credentials.get() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(network_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let insights: Vec<InsightDto> = response.json().await.map_err(decode_error)?;
        Ok(insights.into_iter().map(Insight::from).collect())
    }
}
