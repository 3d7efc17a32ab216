//! Thesaurus Client
//!
//! HTTP transport for the dictionary/thesaurus service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

use super::error::{Result, ThesaurusError};
use crate::config::ApiConfig;

/// Default thesaurus endpoint; the url-encoded query is appended as a path segment.
pub const DEFAULT_ENDPOINT: &str =
    "https://www.dictionaryapi.com/api/v3/references/thesaurus/json";

/// Longest error body quoted back to the user.
const MAX_ERROR_BODY: usize = 200;

// ============================================================================
// Transport
// ============================================================================

/// Fetch capability the query controller drives.
///
/// Returns the raw JSON payload for `query`. Dropping the returned future is
/// how a request is aborted; implementations that keep working regardless
/// are still correct because the controller discards stale completions.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ThesaurusTransport: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<Value>;
}

// ============================================================================
// Dictionary API Client
// ============================================================================

/// reqwest-backed client for the thesaurus JSON API.
#[derive(Clone)]
pub struct DictionaryApiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl DictionaryApiClient {
    /// Create a client for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    /// Create a client from the `[api]` config section and a resolved key.
    pub fn from_config(config: &ApiConfig, api_key: impl Into<String>) -> Self {
        Self::new(api_key)
            .with_endpoint(&config.endpoint)
            .with_timeout(config.request_timeout())
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Lookup URL for `query`, without the API key.
    pub fn lookup_url(&self, query: &str) -> String {
        format!("{}/{}", self.endpoint, urlencoding::encode(query))
    }
}

#[async_trait]
impl ThesaurusTransport for DictionaryApiClient {
    async fn fetch(&self, query: &str) -> Result<Value> {
        let url = self.lookup_url(query);
        log::debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, "application/json");

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(redact)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
            return Err(ThesaurusError::transport(if body.is_empty() {
                format!("Thesaurus API error {}", status)
            } else {
                format!("Thesaurus API error {}: {}", status, body)
            }));
        }

        let body = response.bytes().await.map_err(redact)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Strip the request URL (which carries the API key) before the error can
/// reach a log line or a notification.
fn redact(e: reqwest::Error) -> ThesaurusError {
    ThesaurusError::from(e.without_url())
}
