//! Markup access for the navigation and extraction heuristics
//!
//! The scorer, tab resolver and extractor only need four capabilities from a
//! parsed page: find elements by tag, read an attribute, read visible text,
//! and resolve an href against the page URL. [`Page`] and [`Element`]
//! provide exactly those on top of `scraper`, so no heuristic code depends on
//! the parser directly.
//!
//! `scraper::Html` is not `Send`; build a `Page`, use it, and drop it before
//! the next `.await`.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::url::resolve_link;

/// A parsed HTML page together with the URL it was fetched from
pub struct Page {
    url: Url,
    source: String,
    document: Html,
}

impl Page {
    /// Parses HTML content fetched from `url`
    ///
    /// # Example
    ///
    /// ```
    /// use pcf_harvester::html::Page;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/pcf").unwrap();
    /// let page = Page::parse("<a href='/a.pdf'>Report</a>", &url);
    /// assert_eq!(page.anchors().len(), 1);
    /// ```
    pub fn parse(html: &str, url: &Url) -> Self {
        Self {
            url: url.clone(),
            source: html.to_string(),
            document: Html::parse_document(html),
        }
    }

    /// The URL the page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The raw markup, for sweeps that DOM traversal cannot see
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Finds elements with any of the given tag names, in document order
    pub fn find_all(&self, tags: &[&str]) -> Vec<Element<'_>> {
        if tags.is_empty() {
            return Vec::new();
        }
        self.select(&tags.join(", "))
    }

    /// Finds every element carrying any of the given attributes, in document order
    pub fn with_any_attr(&self, attrs: &[&str]) -> Vec<Element<'_>> {
        if attrs.is_empty() {
            return Vec::new();
        }
        let selector = attrs
            .iter()
            .map(|attr| format!("[{}]", attr))
            .collect::<Vec<_>>()
            .join(", ");
        self.select(&selector)
    }

    /// All `<a>` elements that have an `href` attribute
    pub fn anchors(&self) -> Vec<Element<'_>> {
        self.select("a[href]")
    }

    /// Resolves an href against the page URL
    pub fn resolve(&self, href: &str) -> Option<Url> {
        resolve_link(&self.url, href)
    }

    fn select(&self, selector: &str) -> Vec<Element<'_>> {
        match Selector::parse(selector) {
            Ok(selector) => self.document.select(&selector).map(Element).collect(),
            Err(_) => {
                tracing::debug!("Invalid selector: {}", selector);
                Vec::new()
            }
        }
    }
}

/// A single element of a [`Page`]
#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    /// Lower-case tag name
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }

    /// Attribute value, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// The `href` attribute, if present
    pub fn href(&self) -> Option<&'a str> {
        self.attr("href")
    }

    /// Visible text: all descendant text nodes, whitespace collapsed and trimmed
    pub fn text(&self) -> String {
        self.0
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
