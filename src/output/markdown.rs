//! Markdown report generation
//!
//! This module renders a [`PipelineResult`] as a markdown report listing the
//! path the run took and every stored document.

use crate::pipeline::PipelineResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for a run
///
/// # Arguments
///
/// * `result` - The finished pipeline run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(std::io::Error)` - Failed to create or write the file
pub fn write_markdown_report(result: &PipelineResult, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_report(result);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Formats a run as markdown
pub fn format_markdown_report(result: &PipelineResult) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# PCF Harvest: {} / {}\n\n",
        result.brand, result.product_type
    ));

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", result.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", result.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        result.elapsed().num_seconds()
    ));
    md.push_str(&format!("- **Landing URL**: {}\n", result.landing_url));
    md.push_str(&format!("- **PCF Hub**: {}\n", result.hub_url));
    md.push_str(&format!("- **Tab URL**: {}\n\n", result.tab_url));

    // Counts
    md.push_str("## Results\n\n");
    md.push_str(&format!("- **Found PDFs**: {}\n", result.found_count));
    md.push_str(&format!("- **Downloaded**: {}\n", result.downloaded_count));
    md.push_str(&format!(
        "- **Search Fallback**: {}\n\n",
        if result.fallback_used { "yes" } else { "no" }
    ));

    // State path
    let path: Vec<&str> = result.states.iter().map(|s| s.as_str()).collect();
    md.push_str("## Pipeline Path\n\n");
    md.push_str(&format!("`{}`\n\n", path.join(" -> ")));

    if !result.artifacts.is_empty() {
        md.push_str("## Downloaded Documents\n\n");
        md.push_str("| File | Bytes | Product | URL |\n");
        md.push_str("|------|-------|---------|-----|\n");

        for artifact in &result.artifacts {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                artifact.file_path.display(),
                artifact.byte_size,
                escape_cell(&artifact.associated_text),
                artifact.url
            ));
        }
        md.push('\n');
    }

    let missing = result.found_count.saturating_sub(result.downloaded_count);
    if missing > 0 {
        md.push_str(&format!(
            "_{} discovered document(s) were skipped or failed to download._\n",
            missing
        ));
    }

    md
}
