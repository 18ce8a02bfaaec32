//! PCF Harvester main entry point
//!
//! This is the command-line interface for the PCF report harvester.

use anyhow::{bail, Context};
use clap::Parser;
use pcf_harvester::config::{load_config_with_hash, validate, Config};
use pcf_harvester::crawler::HttpTransport;
use pcf_harvester::output::{print_summary, write_markdown_report};
use pcf_harvester::search::ExaSearch;
use pcf_harvester::url::parse_absolute;
use pcf_harvester::{Orchestrator, PipelineRequest};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// PCF Harvester: finds and downloads product carbon footprint reports
///
/// Starting from a brand's landing page (or one found through web search),
/// the harvester locates the PCF listing, narrows it to one product type,
/// crawls the brand's site for report PDFs and stores them on disk.
/// Options left out are asked for on the terminal.
#[derive(Parser, Debug)]
#[command(name = "pcf-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Product carbon footprint report harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Brand name, e.g. dell
    #[arg(short, long)]
    brand: Option<String>,

    /// Product type, e.g. Laptops
    #[arg(short, long)]
    product_type: Option<String>,

    /// PCF landing page URL; pass an empty value to auto-discover
    #[arg(short, long)]
    landing_url: Option<String>,

    /// The landing page already lists every PCF report
    #[arg(long, conflicts_with = "no_listing")]
    listing: bool,

    /// The landing page does not list the reports itself
    #[arg(long, conflicts_with = "listing")]
    no_listing: bool,

    /// Minimum on-site results before the search fallback runs
    #[arg(long)]
    min_expected: Option<usize>,

    /// Directory for downloaded reports
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Write a markdown report of the run to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Validate config and show the effective settings without running
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_run(cli, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pcf_harvester=info,warn"),
            1 => EnvFilter::new("pcf_harvester=debug,info"),
            2 => EnvFilter::new("pcf_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(min_expected) = cli.min_expected {
        config.pipeline.min_expected = min_expected;
    }
    if let Some(out_dir) = &cli.out_dir {
        config.download.out_dir = out_dir.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config) {
    println!("=== PCF Harvester Dry Run ===\n");

    println!("User Agent: {}", config.user_agent.header_value());

    println!("\nCrawl:");
    println!("  Max pages: {}", config.crawl.max_pages);
    println!("  Max depth: {}", config.crawl.max_depth);
    println!("  Page delay: {}ms", config.crawl.page_delay_ms);

    println!("\nPipeline:");
    println!("  Min expected: {}", config.pipeline.min_expected);
    println!("  Filter mode: {:?}", config.pipeline.filter_mode);

    println!("\nSearch:");
    println!("  Endpoint: {}", config.search.endpoint);
    println!("  API key variable: {}", config.search.api_key_env);
    println!("  Keywords: {}", config.search.keywords.len());

    println!("\nDownloads:");
    println!("  Output directory: {}", config.download.out_dir.display());
    println!("  Concurrency: {}", config.download.concurrency);

    let product_types = config.effective_product_types();
    println!("\nProduct types ({}):", product_types.len());
    for entry in &product_types {
        println!("  - {} -> {}", entry.matches.join("/"), entry.tokens.join(", "));
    }

    println!("\n✓ Configuration is valid");
}

/// Reads one trimmed line from stdin after printing a question
fn prompt(question: &str) -> anyhow::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn required(value: Option<String>, question: &str, name: &str) -> anyhow::Result<String> {
    let value = match value {
        Some(v) => v.trim().to_string(),
        None => prompt(question)?,
    };
    if value.is_empty() {
        bail!("{} is required", name);
    }
    Ok(value)
}

/// Handles the main harvesting run
async fn handle_run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config)?;
    let backend = ExaSearch::from_config(&config.search, transport.clone());
    if !backend.has_credential() {
        tracing::warn!(
            "{} not set; search fallback and landing discovery are disabled",
            config.search.api_key_env
        );
    }
    let backend = Arc::new(backend);
    let orchestrator = Orchestrator::new(config, transport, backend);

    let brand = required(cli.brand, "Brand (e.g., dell, acer, hp): ", "Brand")?;
    let product_type = required(
        cli.product_type,
        "Product Type (e.g., Laptops): ",
        "Product type",
    )?;

    let landing_input = match cli.landing_url {
        Some(url) => url.trim().to_string(),
        None => prompt("PCF Landing URL (press Enter to auto-find): ")?,
    };
    let landing_url = if landing_input.is_empty() {
        orchestrator.discover_landing_url(&brand).await?
    } else {
        parse_absolute(&landing_input)?
    };

    let is_listing_page = if cli.listing {
        true
    } else if cli.no_listing {
        false
    } else {
        prompt("Does this page ALREADY contain the PCF reports? (y/n): ")?
            .to_lowercase()
            .starts_with('y')
    };

    let hub_url = orchestrator.resolve_hub(&landing_url, is_listing_page).await;

    let result = orchestrator
        .run(PipelineRequest {
            brand,
            product_type,
            landing_url,
            hub_url,
            is_listing_page,
        })
        .await?;

    print_summary(&result);

    if let Some(path) = cli.summary {
        write_markdown_report(&result, &path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("✓ Report written to: {}", path.display());
    }

    if !result.is_complete() {
        bail!("Pipeline stopped before completion");
    }
    tracing::info!(
        "Run finished in {}s ({} states)",
        result.elapsed().num_seconds(),
        result.states.len()
    );
    Ok(())
}
