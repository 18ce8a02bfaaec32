//! Independent PDF link extraction strategies
//!
//! Each strategy sees the same page and returns references in document
//! order; [`collect_pdf_links`] unions them.

use regex::Regex;
use std::sync::OnceLock;

use crate::documents::{merge_documents, DocumentRef};
use crate::html::Page;

/// Data attributes that commonly carry download URLs
pub const PDF_DATA_ATTRIBUTES: &[&str] = &["data-href", "data-url", "data-download", "data-asset-url"];

fn pdf_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)https?://[^\s"'<>]+\.pdf(?:\?[^\s"'<>]*)?"#)
            .expect("PDF URL pattern is valid")
    })
}

fn mentions_pdf(value: &str) -> bool {
    value.to_lowercase().contains(".pdf")
}

/// `<a href>` values containing `.pdf`; text is the anchor text
pub fn anchor_hrefs(page: &Page) -> Vec<DocumentRef> {
    page.anchors()
        .into_iter()
        .filter_map(|a| {
            let href = a.href()?;
            if !mentions_pdf(href) {
                return None;
            }
            let url = page.resolve(href)?;
            Some(DocumentRef::new(&url, page.url(), a.text()))
        })
        .collect()
}

/// Elements whose data attributes point at a PDF; text is the element text
pub fn data_attributes(page: &Page) -> Vec<DocumentRef> {
    let mut found = Vec::new();
    for element in page.with_any_attr(PDF_DATA_ATTRIBUTES) {
        for attr in PDF_DATA_ATTRIBUTES {
            let Some(value) = element.attr(attr) else {
                continue;
            };
            if !mentions_pdf(value) {
                continue;
            }
            if let Some(url) = page.resolve(value) {
                found.push(DocumentRef::new(&url, page.url(), element.text()));
            }
        }
    }
    found
}

/// Absolute PDF URLs anywhere in the raw markup, including inline scripts
/// and JSON blobs; text is empty
pub fn raw_markup_sweep(page: &Page) -> Vec<DocumentRef> {
    pdf_pattern()
        .find_iter(page.source())
        .filter_map(|m| page.resolve(m.as_str()))
        .map(|url| DocumentRef::new(&url, page.url(), ""))
        .collect()
}

/// Runs every strategy and deduplicates by URL
///
/// Anchor results come first, then data attributes, then the raw sweep, so
/// the most descriptive text wins for a URL found more than once.
pub fn collect_pdf_links(page: &Page) -> Vec<DocumentRef> {
    let anchors = anchor_hrefs(page);
    let attributes = data_attributes(page);
    let sweep = raw_markup_sweep(page);
    merge_documents([anchors.as_slice(), attributes.as_slice(), sweep.as_slice()])
}
