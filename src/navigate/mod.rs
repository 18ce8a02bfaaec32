//! Site navigation: from a landing page to a product-type tab
//!
//! [`LinkScorer`] chooses the onward link from a brand's landing page and
//! [`resolve_tab`] locates the product-type section of the hub it leads to.
//! [`Navigator`] wraps both with fetching; every failure leaves the caller
//! on the URL it started from.

mod scorer;
mod tabs;

pub use scorer::{CandidateLink, LinkScore, LinkScorer};
pub use tabs::{normalize_label, resolve_tab};

use url::Url;

use crate::config::Config;
use crate::crawler::HttpTransport;
use crate::html::Page;

/// Fetching front end for link scoring and tab resolution
#[derive(Debug, Clone)]
pub struct Navigator {
    transport: HttpTransport,
    scorer: LinkScorer,
}

impl Navigator {
    pub fn new(config: &Config, transport: HttpTransport) -> Self {
        Self {
            transport,
            scorer: LinkScorer::new(config.scoring.clone()),
        }
    }

    /// Follows the strongest PCF link on the landing page
    ///
    /// Returns the landing URL if the page cannot be fetched or no link
    /// scores high enough.
    pub async fn follow_best_link(&self, landing_url: &Url) -> Url {
        let Some(html) = self.transport.fetch_html(landing_url).await else {
            return landing_url.clone();
        };
        let page = Page::parse(&html, landing_url);
        self.scorer.best_link(&page)
    }

    /// Resolves the product-type tab of a hub page
    ///
    /// Returns the hub URL if the page cannot be fetched or has no section
    /// for the product type.
    pub async fn resolve_product_tab(&self, hub_url: &Url, product_type: &str) -> Url {
        let Some(html) = self.transport.fetch_html(hub_url).await else {
            return hub_url.clone();
        };
        let page = Page::parse(&html, hub_url);
        match resolve_tab(&page, product_type) {
            Some(tab) => {
                tracing::info!("Resolved '{}' tab: {}", product_type, tab);
                tab
            }
            None => {
                tracing::info!("No product tab found, staying on PCF hub");
                hub_url.clone()
            }
        }
    }
}
