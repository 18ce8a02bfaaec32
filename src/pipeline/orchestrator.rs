//! Pipeline orchestration

use chrono::Utc;
use std::sync::Arc;
use url::Url;

use crate::config::Config;
use crate::crawler::{BfsCrawler, HttpTransport};
use crate::documents::{merge_documents, DocumentRef};
use crate::extract::DocumentExtractor;
use crate::navigate::Navigator;
use crate::pipeline::{PipelineRequest, PipelineResult, PipelineState};
use crate::search::{DocumentSearch, FallbackSearchClient};
use crate::storage::Downloader;
use crate::url::{extract_domain, file_name, has_pdf_suffix};
use crate::{PcfError, Result, UrlError};

/// Tracks the current state and the path taken
struct StateTracker {
    current: PipelineState,
    visited: Vec<PipelineState>,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            current: PipelineState::Start,
            visited: vec![PipelineState::Start],
        }
    }

    fn advance(&mut self, next: PipelineState) -> Result<()> {
        if !self.current.can_transition_to(next) {
            return Err(PcfError::InvalidTransition {
                from: self.current,
                to: next,
            });
        }
        tracing::debug!("Pipeline state: {} -> {}", self.current, next);
        self.current = next;
        self.visited.push(next);
        Ok(())
    }
}

/// Runs the harvesting pipeline
///
/// Components are built once from the configuration and share one HTTP
/// transport.
pub struct Orchestrator {
    config: Config,
    navigator: Navigator,
    extractor: DocumentExtractor,
    crawler: BfsCrawler,
    search: FallbackSearchClient,
    downloader: Downloader,
}

impl Orchestrator {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `transport` - HTTP transport shared by every component
    /// * `backend` - Search backend used for the fallback and landing discovery
    pub fn new(config: Config, transport: HttpTransport, backend: Arc<dyn DocumentSearch>) -> Self {
        Self {
            navigator: Navigator::new(&config, transport.clone()),
            extractor: DocumentExtractor::new(&config, transport.clone()),
            crawler: BfsCrawler::new(&config, transport.clone()),
            search: FallbackSearchClient::new(backend, config.search.clone()),
            downloader: Downloader::new(&config.download, transport),
            config,
        }
    }

    /// Finds a brand's PCF landing page through the search backend
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - First result that looks like a PCF page
    /// * `Err(PcfError::LandingNotFound)` - Nothing suitable was found
    pub async fn discover_landing_url(&self, brand: &str) -> Result<Url> {
        match self.search.discover_landing_url(brand).await {
            Some(url) => {
                tracing::info!("Auto-detected landing page: {}", url);
                Ok(url)
            }
            None => Err(PcfError::LandingNotFound {
                brand: brand.to_string(),
            }),
        }
    }

    /// Chooses the PCF hub for a landing page
    ///
    /// A landing page that already lists the reports is its own hub;
    /// otherwise the strongest PCF link on it is followed.
    pub async fn resolve_hub(&self, landing_url: &Url, is_listing_page: bool) -> Url {
        if is_listing_page {
            landing_url.clone()
        } else {
            self.navigator.follow_best_link(landing_url).await
        }
    }

    /// Runs the pipeline for one brand and product type
    ///
    /// Component failures only reduce what is found. Errors are returned
    /// for a landing URL without a host and for an illegal state transition.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineResult> {
        let started_at = Utc::now();
        let mut tracker = StateTracker::new();

        let brand = request.brand.trim().to_string();
        let product_type = request.product_type.trim().to_string();
        let domain = extract_domain(&request.landing_url).ok_or(UrlError::MissingDomain)?;
        let hub_url = request.hub_url.clone();
        let tokens = self.config.product_tokens(&product_type);

        tracing::info!(
            "Harvesting {} / {} (hub {}, domain {})",
            brand,
            product_type,
            hub_url,
            domain
        );
        tracker.advance(PipelineState::HubResolved)?;

        let mut fallback_used = false;
        let tab_url;
        let documents;

        if has_pdf_suffix(hub_url.as_str()) {
            tracker.advance(PipelineState::DirectPdfShortcut)?;
            tracing::info!("PCF hub is a direct PDF; skipping crawl");
            tab_url = hub_url.clone();
            documents = vec![DocumentRef::new(&hub_url, &request.landing_url, file_name(&hub_url))];
        } else {
            let on_site = if request.is_listing_page {
                tracker.advance(PipelineState::ListingShortcut)?;
                tracing::info!("Hub lists every report; skipping tab resolution and crawl");
                tab_url = hub_url.clone();
                self.extractor.extract_from_url(&hub_url, &tokens).await
            } else {
                tracker.advance(PipelineState::StandardFlow)?;
                tab_url = self
                    .navigator
                    .resolve_product_tab(&hub_url, &product_type)
                    .await;
                self.throttle().await;

                let page_docs = self
                    .extractor
                    .extract_sections_from_url(&tab_url, &tokens)
                    .await;
                let crawled = self
                    .crawler
                    .crawl(&tab_url, &domain, &self.extractor.filter(&tokens))
                    .await;
                merge_documents([page_docs.as_slice(), crawled.documents.as_slice()])
            };

            tracker.advance(PipelineState::Merged)?;
            tracing::info!("After page extraction and crawl: {} PDF(s)", on_site.len());

            tracker.advance(PipelineState::ThresholdChecked)?;
            documents = if on_site.len() < self.config.pipeline.min_expected {
                tracing::warn!(
                    "Only {} PDFs found (expected {}); switching to search fallback",
                    on_site.len(),
                    self.config.pipeline.min_expected
                );
                let found = self
                    .search
                    .harvest(&brand, &product_type, &domain, &tokens)
                    .await;
                let merged = merge_documents([on_site.as_slice(), found.as_slice()]);
                tracker.advance(PipelineState::FallbackMerged)?;
                fallback_used = true;
                tracing::info!("After search merge: {} PDF(s)", merged.len());
                merged
            } else {
                on_site
            };
        }

        let artifacts = self.downloader.download_all(&documents, &brand).await;
        tracker.advance(PipelineState::Downloaded)?;
        tracker.advance(PipelineState::Done)?;

        Ok(PipelineResult {
            brand,
            product_type,
            landing_url: request.landing_url.to_string(),
            hub_url: hub_url.to_string(),
            tab_url: tab_url.to_string(),
            found_count: documents.len(),
            downloaded_count: artifacts.len(),
            documents,
            artifacts,
            states: tracker.visited,
            fallback_used,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn throttle(&self) {
        let delay = self.config.http.throttle();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
