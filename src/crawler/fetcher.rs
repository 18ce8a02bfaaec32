//! HTTP transport
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with identifying headers
//! - Bounded retry with exponential backoff for transient failures
//! - Page fetches that degrade to `None` on failure
//! - HEAD probes for Content-Type
//! - JSON POSTs for the search API

use crate::config::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Status codes that are retried with backoff
const RETRYABLE_STATUS: &[u16] = &[429, 500, 502, 503, 504];

/// Errors from a single logical request (after retries)
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }
}

/// Returns true if a response status should be retried
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUS.contains(&status.as_u16())
}

/// Returns true if a transport error should be retried
fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Backoff before retry number `attempt` (0-based): `base * 2^attempt`
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Shared HTTP transport for one pipeline run
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    max_retries: u32,
    backoff_base: Duration,
}

impl HttpTransport {
    /// Builds the transport from configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pcf_harvester::config::Config;
    /// use pcf_harvester::crawler::HttpTransport;
    ///
    /// let transport = HttpTransport::new(&Config::default()).unwrap();
    /// ```
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .user_agent(config.user_agent.header_value())
            .default_headers(headers)
            .timeout(config.http.timeout())
            .connect_timeout(config.http.connect_timeout())
            .pool_max_idle_per_host(50)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            max_retries: config.http.max_retries,
            backoff_base: config.http.backoff_base(),
        })
    }

    /// Fetches a page body, absorbing failures
    ///
    /// A failed GET is tried once more with a `Referer` of the site root,
    /// which some CDNs require. If that also fails the page is treated as
    /// absent.
    pub async fn fetch_html(&self, url: &Url) -> Option<String> {
        match self.get_text(url, None).await {
            Ok(body) => return Some(body),
            Err(e) => tracing::warn!("GET primary failed for {}: {}", url, e),
        }

        let referer = format!("{}/", url.origin().ascii_serialization());
        match self.get_text(url, Some(&referer)).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::error!("GET failed for {}: {}", url, e);
                None
            }
        }
    }

    /// GET returning the body as text
    pub async fn get_text(&self, url: &Url, referer: Option<&str>) -> Result<String, FetchError> {
        let response = self
            .send_with_retry(url.as_str(), || {
                let request = self.client.get(url.clone());
                match referer {
                    Some(r) => request.header(REFERER, r),
                    None => request,
                }
            })
            .await?;

        response
            .text()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))
    }

    /// GET returning the raw body
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .send_with_retry(url.as_str(), || self.client.get(url.clone()))
            .await?;

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::transport(url.as_str(), e))
    }

    /// HEAD request returning the declared Content-Type, lower-cased
    ///
    /// Redirects are followed by the client.
    pub async fn head_content_type(&self, url: &Url) -> Result<Option<String>, FetchError> {
        let response = self
            .send_with_retry(url.as_str(), || self.client.head(url.clone()))
            .await?;

        Ok(response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_lowercase()))
    }

    /// POSTs a JSON body and returns the response text
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &T,
    ) -> Result<String, FetchError> {
        let response = self
            .send_with_retry(url, || {
                let mut request = self
                    .client
                    .post(url)
                    .header(ACCEPT, "application/json")
                    .json(body);
                for (name, value) in headers {
                    request = request.header(*name, *value);
                }
                request
            })
            .await?;

        response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, e))
    }

    /// Sends a request, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 429, 500, 502, 503, 504 | Retry with backoff |
    /// | Connect error or timeout | Retry with backoff |
    /// | Other non-success status | Fail immediately |
    /// | Other transport error | Fail immediately |
    ///
    /// At most `max_retries` retries follow the first attempt.
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<Response, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let can_retry = attempt < self.max_retries;

            match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if can_retry && is_retryable_status(response.status()) => {
                    tracing::debug!(
                        "HTTP {} for {}, retry {}/{}",
                        response.status().as_u16(),
                        url,
                        attempt + 1,
                        self.max_retries
                    );
                }
                Ok(response) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: response.status().as_u16(),
                    });
                }
                Err(e) if can_retry && is_retryable_error(&e) => {
                    tracing::debug!(
                        "Transient error for {}: {}, retry {}/{}",
                        url,
                        e,
                        attempt + 1,
                        self.max_retries
                    );
                }
                Err(e) => return Err(FetchError::transport(url, e)),
            }

            tokio::time::sleep(backoff_delay(self.backoff_base, attempt)).await;
            attempt += 1;
        }
    }
}
