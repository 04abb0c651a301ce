//! HTTP client for a running propval server.
//!
//! Configuration is via environment variables:
//! - `PROPVAL_URL` - Base URL (default: `http://127.0.0.1:8501/api/v1`)

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::*;

/// Default URL for a local server.
const DEFAULT_URL: &str = "http://127.0.0.1:8501/api/v1";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// HTTP client for the prediction API.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    client: Client,
}

impl PredictionClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Client for `PROPVAL_URL`, or `None` when it is unset.
    pub fn from_env_if_set() -> Option<Self> {
        std::env::var("PROPVAL_URL").ok().map(Self::new)
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(var("PROPVAL_URL").unwrap_or_else(|| DEFAULT_URL.to_string()))
    }

    /// Create with an explicit base URL, e.g. `http://host:8501/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::BadRequest(body))
                }
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    /// Check the server is up.
    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self.client.get(self.url("/health")).send().await?;
        let _: serde_json::Value = self.handle_response(response).await?;
        Ok(())
    }

    /// Known suburbs in sorted order.
    pub async fn list_suburbs(&self) -> Result<Vec<String>, ClientError> {
        let response = self.client.get(self.url("/suburbs")).send().await?;
        self.handle_response(response).await
    }

    pub async fn model_info(&self) -> Result<ModelInfo, ClientError> {
        let response = self.client.get(self.url("/model")).send().await?;
        self.handle_response(response).await
    }

    /// Predict the price of one property.
    pub async fn predict(&self, record: &FeatureRecord) -> Result<PredictionResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/predict"))
            .json(record)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
