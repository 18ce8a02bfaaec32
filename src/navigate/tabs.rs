//! Product-type tab resolution on a PCF hub page

use url::Url;

use crate::html::Page;
use crate::url::without_fragment;

/// Attributes that name the panel a tab control reveals
const PANEL_ATTRIBUTES: &[&str] = &["aria-controls", "data-bs-target", "data-target"];

/// Normalizes a tab label or product type for comparison
///
/// Trims, lower-cases and drops one trailing `s`, so "Laptops" and
/// "laptop" compare equal.
///
/// ```
/// use pcf_harvester::navigate::normalize_label;
///
/// assert_eq!(normalize_label("  Monitors "), "monitor");
/// assert_eq!(normalize_label("Desktop"), "desktop");
/// ```
pub fn normalize_label(label: &str) -> String {
    let lower = label.trim().to_lowercase();
    match lower.strip_suffix('s') {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

fn with_fragment(base: &Url, fragment: &str) -> Url {
    let mut url = base.clone();
    url.set_fragment(Some(fragment));
    url
}

/// Finds the section of a hub page dedicated to one product type
///
/// Tried in order:
/// 1. An anchor whose text matches, pointing at an in-page fragment or at
///    a URL under the hub
/// 2. An anchor whose text matches and that names a panel through
///    `aria-controls`, `data-bs-target` or `data-target`
/// 3. An `h2`-`h4` heading whose text matches and that has an `id`
///
/// Returns `None` when nothing matches.
pub fn resolve_tab(page: &Page, product_type: &str) -> Option<Url> {
    let wanted = normalize_label(product_type);
    if wanted.is_empty() {
        return None;
    }
    let base = without_fragment(page.url());

    let matching: Vec<_> = page
        .anchors()
        .into_iter()
        .filter(|a| normalize_label(&a.text()) == wanted)
        .collect();

    for anchor in &matching {
        let Some(href) = anchor.href() else {
            continue;
        };
        if let Some(fragment) = href.strip_prefix('#') {
            return Some(with_fragment(&base, fragment));
        }
        if let Some(resolved) = page.resolve(href) {
            if resolved.as_str().starts_with(base.as_str()) {
                return Some(resolved);
            }
        }
    }

    for anchor in &matching {
        let panel = PANEL_ATTRIBUTES
            .iter()
            .find_map(|attr| anchor.attr(attr).filter(|v| !v.is_empty()))
            .unwrap_or("");
        let panel = panel.strip_prefix('#').unwrap_or(panel);
        if !panel.is_empty() {
            return Some(with_fragment(&base, panel));
        }
    }

    page.find_all(&["h2", "h3", "h4"])
        .into_iter()
        .filter(|h| normalize_label(&h.text()) == wanted)
        .find_map(|h| h.attr("id").filter(|id| !id.is_empty()))
        .map(|id| with_fragment(&base, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> Url {
        Url::parse("https://brand.com/pcf#top").unwrap()
    }

    fn resolve(html: &str, product_type: &str) -> Option<String> {
        resolve_tab(&Page::parse(html, &hub()), product_type).map(|u| u.to_string())
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Laptops"), "laptop");
        assert_eq!(normalize_label("laptop"), "laptop");
        // Only one trailing s is removed
        assert_eq!(normalize_label("glass"), "glas");
        assert_eq!(normalize_label("   "), "");
    }

    #[test]
    fn test_fragment_anchor() {
        let html = r##"<a href="#desktops">Desktops</a><a href="#laptops">Laptops</a>"##;
        assert_eq!(
            resolve(html, "laptop").as_deref(),
            Some("https://brand.com/pcf#laptops")
        );
    }

    #[test]
    fn test_same_family_url() {
        let html = r#"<a href="https://other.com/laptops">Laptops</a><a href="/pcf/laptops">Laptops</a>"#;
        assert_eq!(
            resolve(html, "Laptops").as_deref(),
            Some("https://brand.com/pcf/laptops")
        );
    }

    #[test]
    fn test_panel_attributes() {
        let html = r##"<a href="/shop" aria-controls="panel-laptop">Laptop</a>"##;
        assert_eq!(
            resolve(html, "laptops").as_deref(),
            Some("https://brand.com/pcf#panel-laptop")
        );

        let html = r##"<a href="javascript:void(0)" data-bs-target="#mon">Monitors</a>"##;
        assert_eq!(
            resolve(html, "monitor").as_deref(),
            Some("https://brand.com/pcf#mon")
        );

        let html = r##"<a href="/x" data-target="#srv">Servers</a>"##;
        assert_eq!(
            resolve(html, "server").as_deref(),
            Some("https://brand.com/pcf#srv")
        );
    }

    #[test]
    fn test_heading_with_id() {
        let html = r#"<h2>Desktops</h2><h3 id="laptops-section">Laptops</h3>"#;
        assert_eq!(
            resolve(html, "laptop").as_deref(),
            Some("https://brand.com/pcf#laptops-section")
        );
    }

    #[test]
    fn test_no_match() {
        let html = r#"<a href="/pcf/printers">Printers</a><h2>Monitors</h2>"#;
        assert!(resolve(html, "laptop").is_none());
        assert!(resolve(html, "").is_none());
    }
}
