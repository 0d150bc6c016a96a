//! HTTP client for the auth service.
//!
//! Feeds the credential holder: a successful login or registration hands
//! back a bearer token; storing it and emitting the login signal is the
//! caller's job, keeping this client unaware of the session view.

use reqwest::Client;
use serde::Serialize;

use newslens_core::error::Result;

use crate::config::ApiConfig;
use crate::dto::TokenResponse;
use crate::http::{decode_error, network_error, response_error};

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

/// Talks to the `/auth/` endpoints.
#[derive(Clone)]
pub struct AuthApiClient {
    client: Client,
    config: ApiConfig,
}

impl AuthApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Logs in with the OAuth2 password flow (form-encoded body).
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let response = self
            .client
            .post(self.config.endpoint("/auth/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(network_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        response.json().await.map_err(decode_error)
    }

    /// Registers a new account; the backend logs the user straight in.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse> {
        let response = self
            .client
            .post(self.config.endpoint("/auth/register"))
            .json(&RegisterRequest {
                email,
                username,
                password,
            })
            .send()
            .await
            .map_err(network_error)?;
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        response.json().await.map_err(decode_error)
    }
}
