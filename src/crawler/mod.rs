//! Crawler module for page fetching and bounded traversal
//!
//! This module contains:
//! - The shared HTTP transport with retry logic
//! - The BFS frontier and visited set
//! - The domain-scoped breadth-first crawler

mod bfs;
mod fetcher;
mod frontier;

pub use bfs::{scan_page, BfsCrawler, CrawlOutcome, PageScan};
pub use fetcher::{backoff_delay, is_retryable_status, FetchError, HttpTransport};
pub use frontier::{CrawlFrontier, FrontierEntry};
