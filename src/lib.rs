//! PCF Harvester: product carbon footprint report discovery
//!
//! This crate starts from a brand's landing page and a product type, finds
//! the page that lists the brand's PCF reports, resolves the product-type
//! tab, extracts and crawls for PDF links, optionally falls back to an
//! external search API, and stores the documents content-addressed on disk.

pub mod config;
pub mod crawler;
pub mod documents;
pub mod extract;
pub mod html;
pub mod navigate;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for PCF Harvester operations
#[derive(Debug, Error)]
pub enum PcfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("Download error: {0}")]
    Download(#[from] storage::DownloadError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Could not auto-locate a PCF landing page for {brand}")]
    LandingNotFound { brand: String },

    #[error("Invalid pipeline transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: pipeline::PipelineState,
        to: pipeline::PipelineState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for PCF Harvester operations
pub type Result<T> = std::result::Result<T, PcfError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use documents::{merge_documents, DocumentRef};
pub use pipeline::{Orchestrator, PipelineRequest, PipelineResult, PipelineState};
pub use storage::DownloadedArtifact;
