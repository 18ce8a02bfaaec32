//! End-to-end pipeline tests
//!
//! Each test serves a small brand site from wiremock and runs the
//! orchestrator through one branch of the pipeline, downloading into a
//! temporary directory.

use async_trait::async_trait;
use pcf_harvester::config::Config;
use pcf_harvester::crawler::HttpTransport;
use pcf_harvester::search::{DocumentSearch, SearchError, SearchHit};
use pcf_harvester::{Orchestrator, PipelineRequest, PipelineState};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Search backend returning canned hits and recording its queries
#[derive(Default)]
struct StubSearch {
    hits: Vec<SearchHit>,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl DocumentSearch for StubSearch {
    async fn search(&self, query: &str, _num_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.queries
            .lock()
            .expect("query log poisoned")
            .push(query.to_string());
        Ok(self.hits.clone())
    }
}

/// Creates a test configuration with no delays that downloads into `out_dir`
fn create_test_config(out_dir: &TempDir, min_expected: usize) -> Config {
    let mut config = Config::default();
    config.http.max_retries = 0;
    config.http.backoff_base_ms = 1;
    config.http.throttle_ms = 0;
    config.crawl.page_delay_ms = 0;
    config.crawl.max_pages = 10;
    config.search.query_delay_ms = 0;
    config.download.delay_ms = 0;
    config.download.out_dir = out_dir.path().to_path_buf();
    config.pipeline.min_expected = min_expected;
    config
}

fn orchestrator(config: Config, search: Arc<StubSearch>) -> Orchestrator {
    let transport = HttpTransport::new(&config).expect("Failed to build transport");
    Orchestrator::new(config, transport, search)
}

fn site_url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), p)).expect("Failed to parse site URL")
}

async fn mount_page(server: &MockServer, p: &str, body: &str) {
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

async fn mount_pdf(server: &MockServer, p: &str, body: &str) {
    Mock::given(method("HEAD"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.as_bytes().to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(server)
        .await;
}

fn request(server: &MockServer, hub: &str, is_listing_page: bool) -> PipelineRequest {
    PipelineRequest {
        brand: "Acme".to_string(),
        product_type: "Laptops".to_string(),
        landing_url: site_url(server, "/sustainability"),
        hub_url: site_url(server, hub),
        is_listing_page,
    }
}

#[tokio::test]
async fn test_direct_pdf_hub_is_downloaded() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();
    mount_pdf(&mock_server, "/reports/all-products.pdf", "%PDF-1.4 all products").await;

    let search = Arc::new(StubSearch::default());
    let result = orchestrator(create_test_config(&out_dir, 20), search.clone())
        .run(request(&mock_server, "/reports/all-products.pdf", false))
        .await
        .unwrap();

    assert_eq!(
        result.states,
        vec![
            PipelineState::Start,
            PipelineState::HubResolved,
            PipelineState::DirectPdfShortcut,
            PipelineState::Downloaded,
            PipelineState::Done,
        ]
    );
    assert_eq!(result.branch(), Some(PipelineState::DirectPdfShortcut));
    assert!(result.is_complete());
    assert_eq!(result.found_count, 1);
    assert_eq!(result.downloaded_count, 1);
    assert_eq!(result.tab_url, result.hub_url);
    assert!(!result.fallback_used);

    // The threshold never applies to a direct PDF
    assert!(search.queries.lock().unwrap().is_empty());

    let artifact = &result.artifacts[0];
    assert!(artifact.file_path.starts_with(out_dir.path().join("acme")));
    assert_eq!(
        std::fs::read(&artifact.file_path).unwrap(),
        b"%PDF-1.4 all products".to_vec()
    );
}

#[tokio::test]
async fn test_listing_page_skips_navigation_and_crawl() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/pcf",
        r#"<html><body>
            <a href="/pcf/latitude-laptop.pdf">Latitude Laptop PCF</a>
            <a href="/pcf/p2422h.pdf">P2422H Monitor</a>
            <a href="/more">More reports</a>
        </body></html>"#,
    )
    .await;
    mount_pdf(&mock_server, "/pcf/latitude-laptop.pdf", "%PDF-1.4 latitude").await;

    // A listing run never follows links
    Mock::given(method("GET"))
        .and(path("/more"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = orchestrator(create_test_config(&out_dir, 1), Arc::new(StubSearch::default()))
        .run(request(&mock_server, "/pcf", true))
        .await
        .unwrap();

    assert_eq!(result.branch(), Some(PipelineState::ListingShortcut));
    assert_eq!(result.found_count, 1);
    assert!(result.documents[0].url.ends_with("/pcf/latitude-laptop.pdf"));
    assert_eq!(result.documents[0].associated_text, "Latitude Laptop PCF");
    assert_eq!(result.downloaded_count, 1);
    assert!(!result.fallback_used);
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_standard_flow_merges_sections_and_crawl() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/pcf",
        r##"<html><body>
            <nav>
              <a href="#desktops">Desktops</a>
              <a href="#laptops">Laptops</a>
            </nav>
            <h2 id="laptops">Laptops</h2>
            <ul>
              <li><a href="/pcf/7440.pdf">7440</a></li>
            </ul>
            <a href="/family/ultrabooks">Browse ultrabooks</a>
        </body></html>"##,
    )
    .await;
    mount_page(
        &mock_server,
        "/family/ultrabooks",
        r#"<html><body><a href="/pcf/xps-laptop.pdf">XPS</a></body></html>"#,
    )
    .await;
    mount_pdf(&mock_server, "/pcf/7440.pdf", "%PDF-1.4 7440").await;
    mount_pdf(&mock_server, "/pcf/xps-laptop.pdf", "%PDF-1.4 xps").await;

    let result = orchestrator(create_test_config(&out_dir, 1), Arc::new(StubSearch::default()))
        .run(request(&mock_server, "/pcf", false))
        .await
        .unwrap();

    assert_eq!(
        result.states,
        vec![
            PipelineState::Start,
            PipelineState::HubResolved,
            PipelineState::StandardFlow,
            PipelineState::Merged,
            PipelineState::ThresholdChecked,
            PipelineState::Downloaded,
            PipelineState::Done,
        ]
    );
    assert_eq!(result.tab_url, site_url(&mock_server, "/pcf#laptops").to_string());

    // Section extraction finds the model-number link, the crawl finds the other
    let names: Vec<&str> = result
        .documents
        .iter()
        .map(|d| d.url.rsplit('/').next().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["7440.pdf", "xps-laptop.pdf"]);
    assert_eq!(result.downloaded_count, 2);
    assert_ne!(
        result.artifacts[0].content_hash,
        result.artifacts[1].content_hash
    );
}

#[tokio::test]
async fn test_search_fallback_below_threshold() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/pcf",
        r#"<html><body><a href="/pcf/monitor.pdf">Monitor</a></body></html>"#,
    )
    .await;
    mount_pdf(&mock_server, "/docs/latitude.pdf", "%PDF-1.4 from search").await;

    let search = Arc::new(StubSearch {
        hits: vec![
            SearchHit {
                url: site_url(&mock_server, "/docs/latitude.pdf").to_string(),
                title: "Latitude 5440 PCF".to_string(),
            },
            SearchHit {
                url: "https://elsewhere.example/latitude.pdf".to_string(),
                title: "Mirror".to_string(),
            },
            SearchHit {
                url: site_url(&mock_server, "/docs/overview").to_string(),
                title: "Not a PDF".to_string(),
            },
        ],
        queries: Mutex::new(Vec::new()),
    });

    let result = orchestrator(create_test_config(&out_dir, 5), search.clone())
        .run(request(&mock_server, "/pcf", true))
        .await
        .unwrap();

    assert!(result.fallback_used);
    assert!(result.states.contains(&PipelineState::FallbackMerged));
    assert_eq!(result.found_count, 1);
    assert_eq!(result.documents[0].associated_text, "Latitude 5440 PCF");
    assert_eq!(result.downloaded_count, 1);

    let queries = search.queries.lock().unwrap();
    assert!(!queries.is_empty());
    assert!(queries
        .iter()
        .all(|q| q.starts_with("site:127.0.0.1 filetype:pdf Acme")));
}

#[tokio::test]
async fn test_fallback_without_new_urls_keeps_count() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    let models = ["latitude-5440", "latitude-7440", "xps-13", "xps-15", "precision-5680"];
    let anchors: String = models
        .iter()
        .map(|m| format!(r#"<a href="/pcf/{m}.pdf">{m} laptop PCF</a>"#))
        .collect();
    mount_page(&mock_server, "/pcf", &format!("<html><body>{anchors}</body></html>")).await;
    for m in models {
        mount_pdf(&mock_server, &format!("/pcf/{m}.pdf"), &format!("%PDF-1.4 {m}")).await;
    }

    // Search only finds a report the listing already had
    let search = Arc::new(StubSearch {
        hits: vec![SearchHit {
            url: site_url(&mock_server, "/pcf/xps-13.pdf").to_string(),
            title: "XPS 13 from search".to_string(),
        }],
        queries: Mutex::new(Vec::new()),
    });

    let result = orchestrator(create_test_config(&out_dir, 20), search.clone())
        .run(request(&mock_server, "/pcf", true))
        .await
        .unwrap();

    assert!(result.fallback_used);
    assert!(!search.queries.lock().unwrap().is_empty());
    assert_eq!(result.found_count, 5);
    assert_eq!(result.downloaded_count, 5);

    // The on-site reference wins the merge
    let xps = result
        .documents
        .iter()
        .find(|d| d.url.ends_with("/pcf/xps-13.pdf"))
        .unwrap();
    assert_eq!(xps.associated_text, "xps-13 laptop PCF");
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_unreachable_hub_still_completes() {
    let mock_server = MockServer::start().await;
    let out_dir = TempDir::new().unwrap();

    let result = orchestrator(create_test_config(&out_dir, 0), Arc::new(StubSearch::default()))
        .run(request(&mock_server, "/gone", false))
        .await
        .unwrap();

    assert_eq!(result.found_count, 0);
    assert_eq!(result.downloaded_count, 0);
    assert_eq!(result.tab_url, result.hub_url);
    assert!(!result.fallback_used);
    assert_eq!(result.states.last(), Some(&PipelineState::Done));
}
