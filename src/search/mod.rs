//! External document search
//!
//! When on-site discovery finds too few reports, the pipeline asks a web
//! search API for PDFs on the brand's domain. The backend sits behind the
//! [`DocumentSearch`] trait; [`ExaSearch`] is the production implementation.
//! [`FallbackSearchClient`] turns raw hits into [`DocumentRef`]s.

mod exa;
mod query;

pub use exa::ExaSearch;
pub use query::{build_queries, landing_query};

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::config::SearchConfig;
use crate::crawler::FetchError;
use crate::documents::DocumentRef;
use crate::url::{extract_domain, file_name, has_pdf_suffix};

/// URL fragments that mark a likely PCF landing page
const LANDING_URL_HINTS: &[&str] = &["footprint", "sustainab", "product-carbon", "epd"];

/// Errors from a search backend
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search API key is not configured")]
    MissingCredential,

    #[error("Search request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

/// A web search backend
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Search-driven document discovery on top of a [`DocumentSearch`] backend
#[derive(Clone)]
pub struct FallbackSearchClient {
    backend: Arc<dyn DocumentSearch>,
    config: SearchConfig,
}

impl FallbackSearchClient {
    pub fn new(backend: Arc<dyn DocumentSearch>, config: SearchConfig) -> Self {
        Self { backend, config }
    }

    async fn run_query(&self, query: &str, num_results: usize) -> Vec<SearchHit> {
        match self.backend.search(query, num_results).await {
            Ok(hits) => hits,
            Err(SearchError::MissingCredential) => {
                tracing::error!("Search API key not set; search disabled");
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Search API error: {}", e);
                Vec::new()
            }
        }
    }

    /// Harvests PDF references for a brand and product type
    ///
    /// # Arguments
    ///
    /// * `brand` - Brand name as typed by the user
    /// * `product_type` - Product type label, for logging
    /// * `domain` - Host the PDFs must be served from
    /// * `synonyms` - Product-type tokens for the OR'ed query clause
    ///
    /// # Returns
    ///
    /// PDF references unique by URL, in the order the queries found them.
    /// Failed queries contribute nothing.
    pub async fn harvest(
        &self,
        brand: &str,
        product_type: &str,
        domain: &str,
        synonyms: &[String],
    ) -> Vec<DocumentRef> {
        let queries = build_queries(domain, brand, &self.config.keywords, synonyms);
        let domain = domain.to_lowercase();
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for (i, query) in queries.iter().enumerate() {
            if i > 0 && !self.config.query_delay().is_zero() {
                tokio::time::sleep(self.config.query_delay()).await;
            }
            tracing::info!("Search fallback query: {}", query);

            for hit in self.run_query(query, self.config.results_per_query).await {
                let Some(doc) = self.hit_to_document(&hit, &domain) else {
                    continue;
                };
                if seen.insert(doc.url.clone()) {
                    found.push(doc);
                }
            }
        }

        tracing::info!(
            "Search fallback harvested {} PDF(s) for {}/{}",
            found.len(),
            brand,
            product_type
        );
        found
    }

    fn hit_to_document(&self, hit: &SearchHit, domain: &str) -> Option<DocumentRef> {
        let raw = hit.url.trim();
        if raw.is_empty() || !has_pdf_suffix(raw) {
            return None;
        }
        let url = Url::parse(raw).ok()?;
        if !extract_domain(&url)?.contains(domain) {
            return None;
        }

        let title = hit.title.trim();
        let text = if title.is_empty() {
            file_name(&url)
        } else {
            title.to_string()
        };

        Some(DocumentRef {
            url: url.to_string(),
            source_page_url: self.config.endpoint.clone(),
            associated_text: text,
        })
    }

    /// Looks up a brand's PCF landing page
    ///
    /// Returns the first hit whose URL mentions a footprint or
    /// sustainability topic.
    pub async fn discover_landing_url(&self, brand: &str) -> Option<Url> {
        let query = landing_query(brand);
        tracing::info!("Searching for {} PCF landing page", brand);

        self.run_query(&query, self.config.landing_results)
            .await
            .into_iter()
            .find(|hit| {
                let lower = hit.url.to_lowercase();
                LANDING_URL_HINTS.iter().any(|h| lower.contains(h))
            })
            .and_then(|hit| Url::parse(hit.url.trim()).ok())
    }
}
