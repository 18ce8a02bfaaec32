//! Configuration module for PCF Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. A configuration value is built once per run and handed to each
//! component at construction.
//!
//! # Example
//!
//! ```no_run
//! use pcf_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Crawl budget: {} pages", config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_product_types, Config, CrawlConfig, DownloadConfig, FilterMode, HttpConfig,
    PipelineConfig, ProductTypeEntry, ScoringWeights, SearchConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
