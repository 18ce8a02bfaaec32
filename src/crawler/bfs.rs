//! Domain-scoped, bounded breadth-first crawl
//!
//! Starting from one page, the crawler follows in-domain links level by
//! level and records product PDFs it passes. Two budgets end the crawl:
//! `max_pages` distinct pages fetched and `max_depth` link hops from the
//! start.

use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::crawler::frontier::CrawlFrontier;
use crate::crawler::HttpTransport;
use crate::documents::{merge_documents, DocumentRef};
use crate::extract::TokenFilter;
use crate::html::Page;
use crate::url::{has_pdf_suffix, in_domain, is_pdf_url};

/// What one crawl produced
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Product PDFs found, unique by URL in discovery order
    pub documents: Vec<DocumentRef>,

    /// Pages taken from the frontier
    pub pages_visited: usize,

    /// Pages whose fetch failed
    pub pages_failed: usize,
}

/// Links found on one page
#[derive(Debug, Default)]
pub struct PageScan {
    /// In-domain product PDFs
    pub documents: Vec<DocumentRef>,

    /// In-domain non-PDF links, candidates for the next level
    pub links: Vec<Url>,
}

/// Classifies every anchor on a page
///
/// PDF links are kept when in-domain and accepted by the product filter.
/// Other in-domain links are returned for enqueueing.
pub fn scan_page(page: &Page, domain: &str, filter: &TokenFilter) -> PageScan {
    let mut scan = PageScan::default();

    for anchor in page.anchors() {
        let Some(href) = anchor.href() else {
            continue;
        };
        let Some(url) = page.resolve(href) else {
            continue;
        };
        if !in_domain(&url, domain) {
            continue;
        }

        if is_pdf_url(url.as_str()) {
            if filter.is_product_pdf(url.as_str()) {
                scan.documents
                    .push(DocumentRef::new(&url, page.url(), anchor.text()));
            }
        } else if !has_pdf_suffix(url.path()) {
            scan.links.push(url);
        }
    }

    scan
}

/// Bounded BFS over one domain
#[derive(Debug, Clone)]
pub struct BfsCrawler {
    transport: HttpTransport,
    max_pages: usize,
    max_depth: u32,
    page_delay: Duration,
}

impl BfsCrawler {
    pub fn new(config: &Config, transport: HttpTransport) -> Self {
        Self {
            transport,
            max_pages: config.crawl.max_pages,
            max_depth: config.crawl.max_depth,
            page_delay: config.crawl.page_delay(),
        }
    }

    /// Crawls from `start`, staying within hosts ending in `domain`
    ///
    /// # Arguments
    ///
    /// * `start` - First page to fetch
    /// * `domain` - Host suffix that bounds the crawl
    /// * `filter` - Decides which PDFs belong to the product type
    ///
    /// # Returns
    ///
    /// The documents found and page counters. Fetch failures are counted
    /// and skipped.
    pub async fn crawl(&self, start: &Url, domain: &str, filter: &TokenFilter) -> CrawlOutcome {
        let mut frontier = CrawlFrontier::seeded(start);
        let mut outcome = CrawlOutcome::default();

        tracing::info!(
            "BFS crawl from {} (domain {}, max {} pages, depth {})",
            start,
            domain,
            self.max_pages,
            self.max_depth
        );

        while frontier.visited_count() < self.max_pages {
            let Some(entry) = frontier.pop() else {
                break;
            };
            outcome.pages_visited += 1;
            tracing::debug!(
                "Visiting {} (depth {}, {} queued)",
                entry.url,
                entry.depth,
                frontier.len()
            );

            let Some(html) = self.transport.fetch_html(&entry.url).await else {
                outcome.pages_failed += 1;
                continue;
            };

            let scan = {
                let page = Page::parse(&html, &entry.url);
                scan_page(&page, domain, filter)
            };

            outcome.documents =
                merge_documents([outcome.documents.as_slice(), scan.documents.as_slice()]);

            if entry.depth < self.max_depth {
                for link in &scan.links {
                    frontier.push(link, entry.depth + 1);
                }
            }

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        if !frontier.is_empty() {
            tracing::debug!("Page budget reached with {} URLs still queued", frontier.len());
        }
        tracing::info!(
            "BFS crawl finished: {} pages visited, {} failed, {} PDFs",
            outcome.pages_visited,
            outcome.pages_failed,
            outcome.documents.len()
        );

        outcome
    }
}
