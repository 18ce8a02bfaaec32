//! Output module for run summaries and reports
//!
//! This module handles:
//! - The console summary printed when a run completes
//! - Markdown reports of a run and its stored documents

mod markdown;

pub use markdown::{format_markdown_report, write_markdown_report};

use crate::pipeline::PipelineResult;

/// Formats the console summary of a run
pub fn format_summary(result: &PipelineResult) -> String {
    let mut out = String::new();
    out.push_str("\nSummary\n");
    out.push_str("-------\n");
    out.push_str(&format!(
        "Brand / Type:  {} / {}\n",
        result.brand, result.product_type
    ));
    out.push_str(&format!("Landing URL:   {}\n", result.landing_url));
    out.push_str(&format!("PCFs hub:      {}\n", result.hub_url));
    out.push_str(&format!("Tab URL:       {}\n", result.tab_url));
    out.push_str(&format!("Found PDFs:    {}\n", result.found_count));
    out.push_str(&format!("Downloaded:    {}\n", result.downloaded_count));
    out
}

/// Prints the console summary of a run
pub fn print_summary(result: &PipelineResult) {
    print!("{}", format_summary(result));
}
