use crate::config::types::{
    Config, CrawlConfig, DownloadConfig, HttpConfig, PipelineConfig, ProductTypeEntry,
    ScoringWeights, SearchConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound on parallel downloads
const MAX_DOWNLOAD_CONCURRENCY: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    validate_crawl_config(&config.crawl)?;
    validate_pipeline_config(&config.pipeline)?;
    validate_search_config(&config.search)?;
    validate_download_config(&config.download)?;
    validate_scoring(&config.scoring)?;
    validate_product_types(&config.product_types)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.family_suffix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "family_suffix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Search endpoint '{}' must use HTTP(S)",
            config.endpoint
        )));
    }

    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.results_per_query < 1 || config.landing_results < 1 {
        return Err(ConfigError::Validation(
            "search result counts must be >= 1".to_string(),
        ));
    }

    if config.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "search keywords cannot be blank".to_string(),
        ));
    }

    Ok(())
}

fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.out_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("out_dir cannot be empty".to_string()));
    }

    if config.concurrency < 1 || config.concurrency > MAX_DOWNLOAD_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_DOWNLOAD_CONCURRENCY, config.concurrency
        )));
    }

    Ok(())
}

fn validate_scoring(weights: &ScoringWeights) -> Result<(), ConfigError> {
    if weights.jackpot_score <= weights.acceptance_threshold {
        return Err(ConfigError::Validation(format!(
            "jackpot_score ({}) must exceed acceptance_threshold ({})",
            weights.jackpot_score, weights.acceptance_threshold
        )));
    }

    if weights.pdf_indicators.is_empty() {
        return Err(ConfigError::Validation(
            "pdf_indicators cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_product_types(entries: &[ProductTypeEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        if entry.matches.is_empty() || entry.tokens.is_empty() {
            return Err(ConfigError::Validation(
                "product type entries need at least one match and one token".to_string(),
            ));
        }

        if entry
            .matches
            .iter()
            .chain(entry.tokens.iter())
            .any(|s| s.trim().is_empty() || s.to_lowercase() != *s)
        {
            return Err(ConfigError::Validation(format!(
                "product type matches/tokens must be non-blank lower-case: {:?}",
                entry.matches
            )));
        }
    }

    Ok(())
}
