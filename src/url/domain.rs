use url::Url;

/// Extracts the lower-cased host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pcf_harvester::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host ends with `domain`
///
/// This is a plain suffix match on the lower-cased host, so subdomains of the
/// target (`www.dell.com`, `downloads.dell.com`) are in scope. Ports are
/// ignored.
///
/// ```
/// use url::Url;
/// use pcf_harvester::url::in_domain;
///
/// let url = Url::parse("https://downloads.dell.com/pcf/x.pdf").unwrap();
/// assert!(in_domain(&url, "dell.com"));
/// assert!(!in_domain(&url, "hp.com"));
/// ```
pub fn in_domain(url: &Url, domain: &str) -> bool {
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        return false;
    }
    extract_domain(url)
        .map(|host| host.ends_with(&domain))
        .unwrap_or(false)
}

/// Returns true if two URLs share host and effective port
pub fn same_host(a: &Url, b: &Url) -> bool {
    extract_domain(a) == extract_domain(b) && a.port_or_known_default() == b.port_or_known_default()
}
