use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for PCF Harvester
///
/// Every section is optional in the TOML file; missing sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub http: HttpConfig,
    pub crawl: CrawlConfig,
    pub pipeline: PipelineConfig,
    pub search: SearchConfig,
    pub download: DownloadConfig,
    pub scoring: ScoringWeights,
    #[serde(rename = "product-types")]
    pub product_types: Vec<ProductTypeEntry>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the harvester
    pub crawler_name: String,

    /// Version of the harvester
    pub crawler_version: String,

    /// URL with information about the harvester
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "PCF-Harvester".to_string(),
            crawler_version: "3.0".to_string(),
            contact_url: "https://pcf-harvester.example".to_string(),
        }
    }
}

/// Transport behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Retries after the first attempt on connection errors and 429/5xx
    pub max_retries: u32,

    /// Base delay for exponential backoff (milliseconds)
    pub backoff_base_ms: u64,

    /// Pause between navigation steps (milliseconds)
    pub throttle_ms: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 800,
            throttle_ms: 800,
        }
    }
}

/// Breadth-first crawl budgets
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Maximum number of pages visited per crawl
    pub max_pages: usize,

    /// Maximum link depth from the start page
    pub max_depth: u32,

    /// Politeness delay after each fetched page (milliseconds)
    pub page_delay_ms: u64,
}

impl CrawlConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 60,
            max_depth: 2,
            page_delay_ms: 400,
        }
    }
}

/// How a token filter treats the candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Evaluate every candidate before returning
    #[default]
    AllCandidates,

    /// Return after evaluating the first candidate (legacy harvester behaviour)
    FirstCandidateOnly,
}

/// Orchestrator settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Below this many candidates the search fallback is invoked
    pub min_expected: usize,

    /// Token filter behaviour for listing-page extraction
    pub filter_mode: FilterMode,

    /// Suffix that marks a laptop-family product name ("MacBook", "Chromebook")
    pub family_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_expected: 20,
            filter_mode: FilterMode::AllCandidates,
            family_suffix: "book".to_string(),
        }
    }
}

/// External document search settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Search API endpoint
    pub endpoint: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Results requested per fallback query
    pub results_per_query: usize,

    /// Results requested when auto-discovering a landing page
    pub landing_results: usize,

    /// Delay between successive queries (milliseconds)
    pub query_delay_ms: u64,

    /// PCF keyword phrases, one fallback query each
    pub keywords: Vec<String>,
}

impl SearchConfig {
    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.exa.ai/search".to_string(),
            api_key_env: "EXA_API_KEY".to_string(),
            results_per_query: 40,
            landing_results: 10,
            query_delay_ms: 800,
            keywords: [
                "\"product carbon footprint\"",
                "\"Product Environmental Report\"",
                "\"life cycle assessment\"",
                "LCA",
                "EPD",
                "\"kg CO2\"",
                "\"kg CO2e\"",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Downloader settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DownloadConfig {
    /// Root directory for stored documents
    pub out_dir: PathBuf,

    /// Pause after each saved document (milliseconds)
    pub delay_ms: u64,

    /// Number of documents fetched at once; 1 keeps downloads sequential
    pub concurrency: usize,
}

impl DownloadConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data/pcf"),
            delay_ms: 300,
            concurrency: 1,
        }
    }
}

/// Weight table for landing-page link scoring
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScoringWeights {
    /// Any of these in text or URL disqualifies the link
    pub exclusion_terms: Vec<String>,

    /// A `.pdf` link containing one of these is accepted outright
    pub pdf_indicators: Vec<String>,

    /// Strong PCF/sustainability phrases
    pub strong_terms: Vec<String>,

    /// Product category mentions
    pub category_terms: Vec<String>,

    /// Brand product-family suffix, matched anywhere
    pub family_term: String,

    pub jackpot_score: i32,
    pub strong_bonus: i32,
    pub category_bonus: i32,
    pub foreign_host_penalty: i32,
    pub path_prefix_bonus: i32,
    pub fragment_bonus: i32,

    /// Minimum score for the winner to be followed
    pub acceptance_threshold: i32,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exclusion_terms: strings(&[
                "support",
                "services",
                "drivers",
                "partners",
                "marketing",
                "blog",
                "press",
                "solution",
                "contact",
            ]),
            pdf_indicators: strings(&["pcf", "carbon", "footprint", "lca", "epd"]),
            strong_terms: strings(&[
                "product-carbon",
                "carbon-footprint",
                "product carbon footprint",
                "environmental",
                "product environmental report",
                "epd",
                "sustainab",
                "pcf",
            ]),
            category_terms: strings(&["laptop", "desktop", "monitor", "server", "device"]),
            family_term: "book".to_string(),
            jackpot_score: 999,
            strong_bonus: 10,
            category_bonus: 3,
            foreign_host_penalty: 5,
            path_prefix_bonus: 2,
            fragment_bonus: 1,
            acceptance_threshold: 8,
        }
    }
}

/// Maps a product-type label to the tokens used for filtering
///
/// The first entry with any `matches` substring found in the lower-cased
/// product type wins.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductTypeEntry {
    pub matches: Vec<String>,
    pub tokens: Vec<String>,
}

impl ProductTypeEntry {
    fn new(matches: &[&str], tokens: &[&str]) -> Self {
        Self {
            matches: strings(matches),
            tokens: strings(tokens),
        }
    }
}

/// Built-in product-type table used when the config file lists none
pub fn default_product_types() -> Vec<ProductTypeEntry> {
    vec![
        ProductTypeEntry::new(
            &["laptop", "notebook"],
            &["laptop", "notebook", "chromebook", "macbook", "ultrabook", "book"],
        ),
        ProductTypeEntry::new(&["desktop", "pc"], &["desktop", "pc", "tower", "mini"]),
        ProductTypeEntry::new(&["monitor", "display"], &["monitor", "display"]),
        ProductTypeEntry::new(&["server"], &["server"]),
    ]
}

impl Config {
    /// Returns the filter tokens for a product type
    ///
    /// Unknown product types map to themselves; a blank product type yields
    /// no tokens.
    pub fn product_tokens(&self, product_type: &str) -> Vec<String> {
        let wanted = product_type.trim().to_lowercase();
        if wanted.is_empty() {
            return Vec::new();
        }

        self.effective_product_types()
            .into_iter()
            .find(|entry| entry.matches.iter().any(|m| wanted.contains(m.as_str())))
            .map(|entry| entry.tokens)
            .unwrap_or_else(|| vec![wanted])
    }

    /// The configured product-type table, or the built-in one if none is set
    pub fn effective_product_types(&self) -> Vec<ProductTypeEntry> {
        if self.product_types.is_empty() {
            default_product_types()
        } else {
            self.product_types.clone()
        }
    }
}
