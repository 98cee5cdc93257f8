//! News-source directory client.
//!
//! The directory service answers a GET with a JSON envelope containing a list
//! of sources. Consumers depend on the [`SourceProvider`] trait rather than the
//! concrete HTTP client, so the backend can be swapped for a fixture in tests
//! or a different service in production without touching the callers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::FeedError;

/// Default directory endpoint.
pub const DEFAULT_SOURCES_URL: &str = "https://newsapi.org/v2/sources";

/// One entry of the source directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsSource {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Wire envelope returned by the directory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub status: String,
    pub sources: Vec<NewsSource>,
}

/// Abstraction over whatever service provides the source list.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_sources(&self) -> Result<Vec<NewsSource>, FeedError>;
}

/// HTTP client for a NewsAPI-style source directory.
pub struct NewsApiClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

impl NewsApiClient {
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SourceProvider for NewsApiClient {
    async fn fetch_sources(&self) -> Result<Vec<NewsSource>, FeedError> {
        let mut request = self.client.get(&self.endpoint).timeout(self.timeout);
        if let Some(ref key) = self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                code: response.status().as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let envelope = response.json::<SourcesResponse>().await.map_err(|e| {
            FeedError::Parse(format!(
                "Failed to decode source directory response from {}: {}",
                self.endpoint, e
            ))
        })?;

        log::debug!(
            "Source directory returned status '{}' with {} sources",
            envelope.status,
            envelope.sources.len()
        );
        Ok(envelope.sources)
    }
}
