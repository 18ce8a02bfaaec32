//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small sites and run the bounded
//! breadth-first crawl over them end-to-end.

use pcf_harvester::config::Config;
use pcf_harvester::crawler::{BfsCrawler, HttpTransport};
use pcf_harvester::extract::TokenFilter;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no delays and no retries
fn create_test_config(max_pages: usize, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.http.max_retries = 0;
    config.http.backoff_base_ms = 1;
    config.http.throttle_ms = 0;
    config.crawl.max_pages = max_pages;
    config.crawl.max_depth = max_depth;
    config.crawl.page_delay_ms = 0;
    config
}

fn crawler(config: &Config) -> BfsCrawler {
    let transport = HttpTransport::new(config).expect("Failed to build transport");
    BfsCrawler::new(config, transport)
}

fn laptop_filter() -> TokenFilter {
    TokenFilter::new(&["laptop".to_string(), "notebook".to_string()], "book")
}

async fn mount_page(server: &MockServer, p: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn start_url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), p)).expect("Failed to parse start URL")
}

#[tokio::test]
async fn test_crawl_collects_product_pdfs_across_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/pcf",
        r#"<html><body>
            <a href="/pcf/latitude-laptop.pdf">Latitude</a>
            <a href="/pcf/p2422h-monitor.pdf">Monitor</a>
            <a href="/family/notebooks">Notebooks</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/family/notebooks",
        r#"<html><body>
            <a href="/pcf/chromebook-14.pdf">Chromebook 14</a>
            <a href="/pcf/latitude-laptop.pdf">Latitude again</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(10, 2);
    let outcome = crawler(&config)
        .crawl(&start_url(&mock_server, "/pcf"), "127.0.0.1", &laptop_filter())
        .await;

    let urls: Vec<&str> = outcome
        .documents
        .iter()
        .map(|d| d.url.rsplit('/').next().unwrap_or_default())
        .collect();
    assert_eq!(urls, vec!["latitude-laptop.pdf", "chromebook-14.pdf"]);

    // The first sighting keeps its anchor text
    assert_eq!(outcome.documents[0].associated_text, "Latitude");
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.pages_failed, 0);
}

#[tokio::test]
async fn test_crawl_stops_at_max_pages() {
    let mock_server = MockServer::start().await;

    // A chain of ten pages, each linking to the next
    for i in 0..10 {
        mount_page(
            &mock_server,
            &format!("/p{}", i),
            format!(r#"<a href="/p{}">next</a>"#, i + 1),
        )
        .await;
    }

    let config = create_test_config(3, 20);
    let outcome = crawler(&config)
        .crawl(&start_url(&mock_server, "/p0"), "127.0.0.1", &laptop_filter())
        .await;

    assert_eq!(outcome.pages_visited, 3);
    assert!(outcome.documents.is_empty());
}

#[tokio::test]
async fn test_crawl_stays_in_domain() {
    let mock_server = MockServer::start().await;
    let port = start_url(&mock_server, "/").port().expect("mock server has a port");

    // Same server, but reached through a host outside the crawl domain
    Mock::given(method("GET"))
        .and(path("/offsite"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/pcf",
        format!(
            r#"<a href="http://localhost:{port}/offsite">Elsewhere</a>
               <a href="http://localhost:{port}/docs/laptop-report.pdf">Offsite laptop</a>
               <a href="/docs/notebook-report.pdf">Notebook</a>"#
        ),
    )
    .await;

    let config = create_test_config(10, 2);
    let outcome = crawler(&config)
        .crawl(&start_url(&mock_server, "/pcf"), "127.0.0.1", &laptop_filter())
        .await;

    assert_eq!(outcome.pages_visited, 1);
    assert_eq!(outcome.documents.len(), 1);
    assert!(outcome.documents[0].url.ends_with("/docs/notebook-report.pdf"));
}

#[tokio::test]
async fn test_crawl_self_link_terminates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r##"<a href="/loop">again</a><a href="/loop#top">again</a><a href="#section">jump</a>"##,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(50, 5);
    let outcome = crawler(&config)
        .crawl(&start_url(&mock_server, "/loop"), "127.0.0.1", &laptop_filter())
        .await;

    assert_eq!(outcome.pages_visited, 1);
}

#[tokio::test]
async fn test_crawl_counts_failed_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/pcf",
        r#"<a href="/missing">Gone</a><a href="/pcf/laptop.pdf">Laptop</a>"#.to_string(),
    )
    .await;

    let config = create_test_config(10, 2);
    let outcome = crawler(&config)
        .crawl(&start_url(&mock_server, "/pcf"), "127.0.0.1", &laptop_filter())
        .await;

    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.pages_failed, 1);
    assert_eq!(outcome.documents.len(), 1);
}

#[tokio::test]
async fn test_crawl_depth_zero_visits_only_start() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/pcf", r#"<a href="/a">A</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(10, 0);
    let outcome = crawler(&config)
        .crawl(&start_url(&mock_server, "/pcf"), "127.0.0.1", &laptop_filter())
        .await;

    assert_eq!(outcome.pages_visited, 1);
}
