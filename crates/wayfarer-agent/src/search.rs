//! Client for the custom search REST endpoint.
//!
//! Failures are values, not errors: the web and flight tools hand them to
//! the model as an `error` string next to an empty result list.

use crate::error::AgentError;
use crate::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wayfarer_core::{ExposeSecret, SearchConfig, SecretString};

/// The endpoint never returns more than this many items per request.
pub const MAX_RESULTS_PER_REQUEST: usize = 10;

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Why a search produced no results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchFailure {
    #[error("Missing CUSTOM_SEARCH_API_KEY or CUSTOM_SEARCH_CX in environment.")]
    MissingCredentials,

    #[error("Request error: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

/// Custom search client.
pub struct CustomSearchClient {
    client: Client,
    api_key: Option<SecretString>,
    cx: Option<String>,
    endpoint: String,
}

impl CustomSearchClient {
    /// Build a client. Missing credentials are allowed here and reported
    /// per search.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.expose_secret().is_empty()),
            cx: config.cx.clone().filter(|cx| !cx.is_empty()),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Whether both the API key and engine id are configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.cx.is_some()
    }

    /// Run one query and return at most `max_results` hits.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<SearchHit>, SearchFailure> {
        let (api_key, cx) = match (&self.api_key, &self.cx) {
            (Some(key), Some(cx)) => (key, cx),
            _ => return Err(SearchFailure::MissingCredentials),
        };

        let num = max_results.clamp(1, MAX_RESULTS_PER_REQUEST).to_string();
        debug!(query, num = %num, "Custom search request");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", api_key.expose_secret().as_str()),
                ("cx", cx.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchFailure::Request(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Custom search returned an error");
            return Err(SearchFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchFailure::Decode(e.to_string()))?;

        Ok(data
            .items
            .into_iter()
            .take(max_results)
            .map(|item| SearchHit {
                title: item.title,
                snippet: item.snippet,
                url: item.link,
            })
            .collect())
    }
}
