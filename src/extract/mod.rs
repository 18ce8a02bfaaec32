//! Document link extraction
//!
//! This module turns a fetched page into PDF [`DocumentRef`]s:
//! - Three unioned strategies (anchors, data attributes, raw markup sweep)
//! - Product-type token filtering
//! - A section-aware variant for hub pages that group links by family
//!
//! The pure functions take markup; [`DocumentExtractor`] adds fetching.

mod filter;
mod section;
mod strategies;

pub use filter::TokenFilter;
pub use section::extract_by_section;
pub use strategies::{
    anchor_hrefs, collect_pdf_links, data_attributes, raw_markup_sweep, PDF_DATA_ATTRIBUTES,
};

use url::Url;

use crate::config::{Config, FilterMode};
use crate::crawler::HttpTransport;
use crate::documents::DocumentRef;
use crate::html::Page;

/// Runs every strategy over the markup, then applies the token filter
///
/// # Arguments
///
/// * `html` - Page markup
/// * `page_url` - URL the markup was fetched from
/// * `filter` - Product-type filter; an empty filter keeps everything
/// * `mode` - Whether every candidate is evaluated
pub fn extract_documents(
    html: &str,
    page_url: &Url,
    filter: &TokenFilter,
    mode: FilterMode,
) -> Vec<DocumentRef> {
    let page = Page::parse(html, page_url);
    let found = collect_pdf_links(&page);
    tracing::debug!("Found {} PDF links on {}", found.len(), page_url);
    filter.apply(found, mode)
}

/// Section-aware extraction over markup
pub fn extract_sections(html: &str, page_url: &Url, filter: &TokenFilter) -> Vec<DocumentRef> {
    let page = Page::parse(html, page_url);
    extract_by_section(&page, filter)
}

/// Fetching front end for the extraction strategies
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    transport: HttpTransport,
    family_suffix: String,
    mode: FilterMode,
}

impl DocumentExtractor {
    pub fn new(config: &Config, transport: HttpTransport) -> Self {
        Self {
            transport,
            family_suffix: config.pipeline.family_suffix.clone(),
            mode: config.pipeline.filter_mode,
        }
    }

    /// Builds the filter for a set of product-type tokens
    pub fn filter(&self, tokens: &[String]) -> TokenFilter {
        TokenFilter::new(tokens, &self.family_suffix)
    }

    /// Fetches a page and runs the robust, token-filtered extraction
    ///
    /// A page that cannot be fetched yields no documents.
    pub async fn extract_from_url(&self, url: &Url, tokens: &[String]) -> Vec<DocumentRef> {
        let Some(html) = self.transport.fetch_html(url).await else {
            return Vec::new();
        };
        let docs = extract_documents(&html, url, &self.filter(tokens), self.mode);
        tracing::info!("Extracted {} PDFs from {}", docs.len(), url);
        docs
    }

    /// Fetches a page and runs the section-aware extraction
    pub async fn extract_sections_from_url(
        &self,
        url: &Url,
        tokens: &[String],
    ) -> Vec<DocumentRef> {
        let Some(html) = self.transport.fetch_html(url).await else {
            return Vec::new();
        };
        let docs = extract_sections(&html, url, &self.filter(tokens));
        tracing::info!("Section-aware extraction found {} PDFs on {}", docs.len(), url);
        docs
    }
}
