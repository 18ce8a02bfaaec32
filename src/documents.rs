//! Discovered document references and URL-keyed merging

use std::collections::HashSet;
use url::Url;

/// A discovered PDF reference
///
/// Identity is `url`: the absolute URL exactly as resolved against its
/// source page, compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Absolute document URL
    pub url: String,

    /// Page the reference was found on (or the search endpoint's hit page)
    pub source_page_url: String,

    /// Anchor text, section label or search title; may be empty
    pub associated_text: String,
}

impl DocumentRef {
    pub fn new(url: &Url, source_page: &Url, associated_text: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            source_page_url: source_page.to_string(),
            associated_text: associated_text.into(),
        }
    }
}

/// Unions document lists keyed by URL
///
/// The first occurrence of each URL keeps its metadata, and output order is
/// the order of first appearance across the lists taken left to right.
/// Entries with an empty URL are dropped.
///
/// ```
/// use pcf_harvester::documents::{merge_documents, DocumentRef};
///
/// let doc = |u: &str, t: &str| DocumentRef {
///     url: u.to_string(),
///     source_page_url: String::new(),
///     associated_text: t.to_string(),
/// };
/// let page = vec![doc("https://a.com/1.pdf", "page")];
/// let crawl = vec![doc("https://a.com/1.pdf", "crawl"), doc("https://a.com/2.pdf", "")];
///
/// let merged = merge_documents([page.as_slice(), crawl.as_slice()]);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0].associated_text, "page");
/// ```
pub fn merge_documents<'a, I>(lists: I) -> Vec<DocumentRef>
where
    I: IntoIterator<Item = &'a [DocumentRef]>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for list in lists {
        for doc in list {
            if doc.url.is_empty() || !seen.insert(doc.url.as_str()) {
                continue;
            }
            merged.push(doc.clone());
        }
    }

    merged
}
