//! Harvesting pipeline
//!
//! The [`Orchestrator`] sequences navigation, extraction, crawling, the
//! search fallback and downloading for one brand and product type. Each run
//! walks the [`PipelineState`] machine and reports the path it took in the
//! [`PipelineResult`].

mod orchestrator;
mod state;

pub use orchestrator::Orchestrator;
pub use state::PipelineState;

use chrono::{DateTime, Utc};
use url::Url;

use crate::documents::DocumentRef;
use crate::storage::DownloadedArtifact;

/// Inputs for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Brand name, as entered
    pub brand: String,

    /// Product type label, e.g. "Laptops"
    pub product_type: String,

    /// Page the user started from; its host bounds the crawl
    pub landing_url: Url,

    /// Page expected to list the brand's PCF reports
    pub hub_url: Url,

    /// The hub already lists every relevant report
    pub is_listing_page: bool,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub brand: String,
    pub product_type: String,
    pub landing_url: String,
    pub hub_url: String,
    pub tab_url: String,

    /// Unique documents discovered before downloading
    pub found_count: usize,

    /// Documents saved to disk
    pub downloaded_count: usize,

    pub documents: Vec<DocumentRef>,
    pub artifacts: Vec<DownloadedArtifact>,

    /// States visited, in order
    pub states: Vec<PipelineState>,

    /// Whether the search fallback ran
    pub fallback_used: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineResult {
    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// True when the run reached its terminal state
    pub fn is_complete(&self) -> bool {
        self.states.last().is_some_and(PipelineState::is_terminal)
    }

    /// The branch the run took
    pub fn branch(&self) -> Option<PipelineState> {
        self.states.iter().copied().find(PipelineState::is_branch)
    }
}
