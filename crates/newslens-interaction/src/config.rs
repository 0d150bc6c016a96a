//! API client configuration.

use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where the backend lives.
///
/// Resolution priority: explicit value > `NEWSLENS_API_URL` environment
/// variable > the development default.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Creates a config pointing at an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        // Keep joins simple: endpoints always start with '/'.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Reads `NEWSLENS_API_URL`, falling back to the development default.
    pub fn from_env() -> Self {
        match env::var("NEWSLENS_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    /// Joins an endpoint path (starting with '/') onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
