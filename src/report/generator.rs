//! Markdown and JSON report generation.
//!
//! This module renders the view bundles into the final report. It only
//! displays what the aggregation engine computed; it never goes back to
//! the dataset itself.

use crate::models::{BreakdownEntry, InvestmentRow};
use crate::view::{InvestorView, OverallView, StartupView};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the dataset the report was built from.
    pub dataset: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records in the full dataset.
    pub record_count: usize,
}

/// The rendered view, one variant per mode.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewReport {
    /// Overall market analysis.
    Overall(OverallView),
    /// Per-startup lookup.
    Startup(StartupView),
    /// Per-investor profile.
    Investor(InvestorView),
}

/// The complete funding analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// The selected view's aggregate results.
    #[serde(flatten)]
    pub body: ViewReport,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    match &report.body {
        ViewReport::Overall(view) => output.push_str(&generate_overall_section(view)),
        ViewReport::Startup(view) => output.push_str(&generate_startup_section(view)),
        ViewReport::Investor(view) => output.push_str(&generate_investor_section(view)),
    }

    output.push_str(&generate_metadata_section(&report.metadata));
    output
}

/// Generate the metadata footer section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("---\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset));
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    section
}

/// Generate the overall market analysis section.
fn generate_overall_section(view: &OverallView) -> String {
    let mut section = String::new();

    section.push_str("# Overall Analysis\n\n");

    section.push_str("| Total | Max | Avg | Startups |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} Cr | {} Cr | {} Cr | {} |\n\n",
        view.stats.total, view.stats.max_funding, view.stats.avg_funding, view.stats.startup_count
    ));

    section.push_str("## Month-on-Month Investment Trend\n\n");
    if view.mom.is_empty() {
        section.push_str("No dated records in the dataset.\n\n");
    } else {
        section.push_str(&format!("| Month_Year | {} |\n", view.metric));
        section.push_str("|:---|---:|\n");
        for point in &view.mom {
            section.push_str(&format!("| {} | {} |\n", point.label(), point.value));
        }
        section.push('\n');
    }

    section
}

/// Generate the per-startup details section.
fn generate_startup_section(view: &StartupView) -> String {
    let mut section = String::new();

    section.push_str(&format!("# Startup Details: {}\n\n", view.name));

    if !view.found {
        section.push_str("No funding records found for this startup.\n\n");
        return section;
    }

    match &view.city {
        Some(city) => section.push_str(&format!("**City:** {}\n\n", city)),
        None => section.push_str("City information not found for this startup.\n\n"),
    }
    section.push_str(&format!("**Total Raised:** {} Cr\n\n", view.total));

    section.push_str("## Funding History\n\n");
    section.push_str(&generate_investment_table(&view.history));

    section
}

/// Generate the per-investor profile section.
fn generate_investor_section(view: &InvestorView) -> String {
    let mut section = String::new();

    section.push_str(&format!("# Investments by {}\n\n", view.name));

    if !view.found {
        section.push_str("No funding records mention this investor.\n\n");
        return section;
    }

    section.push_str("## Most Recent Investments\n\n");
    section.push_str(&generate_investment_table(&view.recent));

    section.push_str("## Biggest Investments\n\n");
    section.push_str(&generate_breakdown_table("Startup", &view.biggest));

    section.push_str("## Sector Investment\n\n");
    section.push_str(&generate_breakdown_table("Vertical", &view.by_sector));

    section.push_str("## City Investment Distribution\n\n");
    section.push_str(&generate_breakdown_table("City", &view.by_city));

    section.push_str("## Investment Round Distribution\n\n");
    section.push_str(&generate_breakdown_table("Round", &view.by_round));

    section.push_str("## Yearly Investment Trend\n\n");
    if view.yearly.is_empty() {
        section.push_str("No dated records for this investor.\n\n");
    } else {
        section.push_str("| Year | Amount |\n");
        section.push_str("|:---|---:|\n");
        for point in &view.yearly {
            section.push_str(&format!("| {} | {} |\n", point.year, point.total));
        }
        section.push('\n');
    }

    section
}

/// Render a table of investment rows with the display columns.
fn generate_investment_table(rows: &[InvestmentRow]) -> String {
    if rows.is_empty() {
        return "No investments to display.\n\n".to_string();
    }

    let mut table = String::new();
    table.push_str("| Date | Startup | Vertical | City | Round | Amount |\n");
    table.push_str("|:---|:---|:---|:---|:---|---:|\n");

    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.date_display(),
            row.startup,
            row.vertical,
            display_or_dash(&row.city),
            row.round,
            row.amount_display()
        ));
    }
    table.push('\n');

    table
}

/// Render a label/total breakdown table.
fn generate_breakdown_table(label_header: &str, entries: &[BreakdownEntry]) -> String {
    if entries.is_empty() {
        return "No data.\n\n".to_string();
    }

    let mut table = String::new();
    table.push_str(&format!("| {} | Amount |\n", label_header));
    table.push_str("|:---|---:|\n");

    for entry in entries {
        table.push_str(&format!(
            "| {} | {} |\n",
            display_or_dash(&entry.label),
            entry.total
        ));
    }
    table.push('\n');

    table
}

/// Empty categorical values render as a dash.
fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
