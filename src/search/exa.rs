//! Exa search API backend

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::crawler::HttpTransport;
use crate::search::{DocumentSearch, SearchError, SearchHit};

#[derive(Debug, Default, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Option<Vec<ExaResult>>,
    #[serde(default)]
    documents: Option<Vec<ExaResult>>,
}

#[derive(Debug, Deserialize)]
struct ExaResult {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Parses an Exa response body
///
/// Hits are read from `results`, or from `documents` when `results` is
/// missing, null or empty. Entries without a URL are dropped.
fn parse_response(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let response: ExaResponse = serde_json::from_str(body)?;
    let items = match response.results {
        Some(results) if !results.is_empty() => results,
        _ => response.documents.unwrap_or_default(),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| {
            Some(SearchHit {
                url: item.url?,
                title: item.title.unwrap_or_default(),
            })
        })
        .collect())
}

/// Exa `/search` client
pub struct ExaSearch {
    transport: HttpTransport,
    endpoint: String,
    api_key: Option<String>,
}

impl ExaSearch {
    pub fn new(transport: HttpTransport, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Builds the client, reading the API key from the configured
    /// environment variable
    pub fn from_config(config: &SearchConfig, transport: HttpTransport) -> Self {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::new(transport, config.endpoint.clone(), api_key)
    }

    /// True when an API key is available; without one every search fails
    /// with [`SearchError::MissingCredential`]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl DocumentSearch for ExaSearch {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingCredential)?;

        let body = serde_json::json!({
            "query": query,
            "numResults": num_results,
        });

        let text = self
            .transport
            .post_json(&self.endpoint, &[("x-api-key", api_key)], &body)
            .await?;

        let hits = parse_response(&text)?;
        tracing::debug!("Exa returned {} hits for {}", hits.len(), query);
        Ok(hits)
    }
}
