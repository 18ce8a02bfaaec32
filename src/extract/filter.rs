//! Product-type token filtering

use regex::Regex;

use crate::config::FilterMode;
use crate::documents::DocumentRef;
use crate::url::has_pdf_suffix;

/// Filters documents by product-type tokens
///
/// A text matches when it contains any token, or any word ending in the
/// product-family suffix (`book` by default, covering "MacBook",
/// "Chromebook", "Notebook").
#[derive(Debug, Clone)]
pub struct TokenFilter {
    tokens: Vec<String>,
    family: Option<Regex>,
}

impl TokenFilter {
    pub fn new(tokens: &[String], family_suffix: &str) -> Self {
        let suffix = family_suffix.trim().to_lowercase();
        let family = if suffix.is_empty() {
            None
        } else {
            Regex::new(&format!(r"\b\w*{}\b", regex::escape(&suffix))).ok()
        };

        Self {
            tokens: tokens.iter().map(|t| t.to_lowercase()).collect(),
            family,
        }
    }

    /// Lower-cased tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True when no tokens were supplied, which disables filtering
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True if the text contains any token
    pub fn contains_token(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.tokens.iter().any(|t| text.contains(t.as_str()))
    }

    fn matches_family(&self, lower: &str) -> bool {
        self.family
            .as_ref()
            .map(|re| re.is_match(lower))
            .unwrap_or(false)
    }

    /// True if a document's associated text passes the filter
    pub fn matches_text(&self, text: &str) -> bool {
        self.contains_token(text) || self.matches_family(&text.to_lowercase())
    }

    /// Decides whether a crawled PDF URL belongs to the product type
    ///
    /// The URL must end in `.pdf`. A family-suffix word anywhere in the URL
    /// is accepted; otherwise any token must appear. With no tokens every PDF
    /// is accepted.
    pub fn is_product_pdf(&self, url: &str) -> bool {
        if !has_pdf_suffix(url) {
            return false;
        }

        let lower = url.to_lowercase();
        if self.matches_family(&lower) {
            return true;
        }

        self.tokens.is_empty() || self.contains_token(&lower)
    }

    /// Applies the filter to extracted documents
    ///
    /// Without tokens the list is returned unchanged.
    /// [`FilterMode::FirstCandidateOnly`] stops after the first candidate,
    /// reproducing the legacy harvester's early return.
    pub fn apply(&self, docs: Vec<DocumentRef>, mode: FilterMode) -> Vec<DocumentRef> {
        if self.is_empty() {
            return docs;
        }

        let total = docs.len();
        let evaluated = match mode {
            FilterMode::AllCandidates => total,
            FilterMode::FirstCandidateOnly => total.min(1),
        };

        let keep: Vec<DocumentRef> = docs
            .into_iter()
            .take(evaluated)
            .filter(|d| self.matches_text(&d.associated_text))
            .collect();

        tracing::info!(
            "Filtered PDFs using tokens + family suffix: kept {} of {}",
            keep.len(),
            total
        );
        keep
    }
}
