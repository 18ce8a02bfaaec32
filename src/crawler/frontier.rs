//! Crawl frontier for breadth-first traversal
//!
//! The frontier is a FIFO queue of `(url, depth)` entries plus the set of
//! URLs already taken from it. A URL is handed out at most once, so the
//! visited count grows by one per `pop` and the page budget always ends the
//! crawl.

use std::collections::{HashSet, VecDeque};
use url::Url;

use crate::url::without_fragment;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Page URL, fragment removed
    pub url: Url,

    /// Link distance from the start page
    pub depth: u32,
}

/// FIFO frontier with a visited set
#[derive(Debug, Default)]
pub struct CrawlFrontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl CrawlFrontier {
    /// Creates a frontier seeded with the start URL at depth 0
    pub fn seeded(start: &Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(start, 0);
        frontier
    }

    /// Queues a URL unless it has already been visited
    ///
    /// Fragments are dropped: `page#a` and `page#b` fetch the same document.
    /// Returns true if the URL was queued.
    pub fn push(&mut self, url: &Url, depth: u32) -> bool {
        let url = without_fragment(url);
        if self.visited.contains(url.as_str()) {
            return false;
        }
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Takes the next unvisited entry and marks it visited
    ///
    /// Entries queued more than once before their first visit are skipped.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.queue.pop_front() {
            if self.visited.insert(entry.url.as_str().to_string()) {
                return Some(entry);
            }
        }
        None
    }

    /// Number of distinct URLs handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of queued entries (may include not-yet-skipped duplicates)
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
