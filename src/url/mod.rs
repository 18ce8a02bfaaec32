//! URL handling module for PCF Harvester
//!
//! This module provides href resolution, domain scoping and the PDF URL
//! predicates shared by the extractor, crawler and downloader. Document
//! identity is the resolved absolute URL; nothing here normalizes beyond
//! resolution.

mod domain;
mod resolve;

pub use domain::{extract_domain, in_domain, same_host};
pub use resolve::{file_name, parse_absolute, resolve_link, without_fragment};

/// Returns true if the URL path looks like a PDF
///
/// Matches a `.pdf` suffix or a `.pdf?` query boundary, case-insensitively.
///
/// ```
/// use pcf_harvester::url::is_pdf_url;
///
/// assert!(is_pdf_url("https://example.com/a.PDF"));
/// assert!(is_pdf_url("https://example.com/a.pdf?v=2"));
/// assert!(!is_pdf_url("https://example.com/a.pdfx"));
/// ```
pub fn is_pdf_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with(".pdf") || lower.contains(".pdf?")
}

/// Returns true if the string ends in `.pdf`, case-insensitively
pub fn has_pdf_suffix(url: &str) -> bool {
    url.to_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_url() {
        assert!(is_pdf_url("https://example.com/report.pdf"));
        assert!(is_pdf_url("https://example.com/REPORT.Pdf"));
        assert!(is_pdf_url("https://example.com/report.pdf?download=1"));
        assert!(!is_pdf_url("https://example.com/report.html"));
        assert!(!is_pdf_url("https://example.com/pdf/listing"));
    }

    #[test]
    fn test_has_pdf_suffix() {
        assert!(has_pdf_suffix("/a/b.PDF"));
        assert!(!has_pdf_suffix("/a/b.pdf?x=1"));
    }
}
