//! Section-aware extraction
//!
//! Some hub pages group report links under a product-family heading or list
//! item and label each link only with a model number. Walking the page in
//! document order and remembering the most recent section label lets those
//! links be attributed to the family.

use std::collections::HashSet;

use crate::documents::DocumentRef;
use crate::extract::TokenFilter;
use crate::html::Page;
use crate::url::has_pdf_suffix;

/// Collects PDF anchors that sit under a token-matching section
///
/// `h2`/`h3` headings always start a new section; an `li` starts one when
/// its text contains a token. A `.pdf` anchor is kept if the current section
/// label contains a token; its text falls back to the section label.
pub fn extract_by_section(page: &Page, filter: &TokenFilter) -> Vec<DocumentRef> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();
    let mut current_section: Option<String> = None;

    for element in page.find_all(&["h2", "h3", "li", "a"]) {
        let text = element.text().to_lowercase();

        match element.tag() {
            "h2" | "h3" => current_section = Some(text),
            "li" if filter.contains_token(&text) => current_section = Some(text),
            "a" => {
                let Some(href) = element.href() else {
                    continue;
                };
                if !has_pdf_suffix(href) {
                    continue;
                }
                let Some(section) = current_section.as_deref() else {
                    continue;
                };
                if !filter.contains_token(section) {
                    continue;
                }
                let Some(url) = page.resolve(href) else {
                    continue;
                };
                if !seen.insert(url.to_string()) {
                    continue;
                }

                let anchor_text = element.text();
                let associated = if anchor_text.is_empty() {
                    section.to_string()
                } else {
                    anchor_text
                };
                results.push(DocumentRef::new(&url, page.url(), associated));
            }
            _ => {}
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn laptop_filter() -> TokenFilter {
        TokenFilter::new(&["laptop".to_string(), "notebook".to_string()], "book")
    }

    fn page(html: &str) -> Page {
        Page::parse(html, &Url::parse("https://brand.com/pcf").unwrap())
    }

    #[test]
    fn test_links_under_matching_heading_are_kept() {
        let p = page(
            r#"<h2>Laptops</h2>
               <a href="/pcf/latitude-7440.pdf">Latitude 7440</a>
               <a href="/pcf/latitude-5440.pdf"></a>
               <h2>Monitors</h2>
               <a href="/pcf/p2422h.pdf">P2422H</a>"#,
        );
        let docs = extract_by_section(&p, &laptop_filter());
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].url, "https://brand.com/pcf/latitude-7440.pdf");
        assert_eq!(docs[0].associated_text, "Latitude 7440");
        assert_eq!(docs[1].associated_text, "laptops");
    }

    #[test]
    fn test_matching_list_item_starts_section() {
        let p = page(
            r#"<h3>All products</h3>
               <ul>
                 <li>Notebook family <a href="/nb/14.pdf">14 inch</a></li>
               </ul>"#,
        );
        let docs = extract_by_section(&p, &laptop_filter());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://brand.com/nb/14.pdf");
    }

    #[test]
    fn test_links_before_any_section_are_ignored() {
        let p = page(r#"<a href="/laptop.pdf">Laptop</a><h2>Laptops</h2>"#);
        assert!(extract_by_section(&p, &laptop_filter()).is_empty());
    }

    #[test]
    fn test_non_pdf_links_and_duplicates() {
        let p = page(
            r#"<h2>Laptop reports</h2>
               <a href="/a.html">Page</a>
               <a href="/a.pdf">A</a>
               <a href="/a.pdf">A again</a>"#,
        );
        let docs = extract_by_section(&p, &laptop_filter());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].associated_text, "A");
    }
}
