//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Metric;
use clap::Parser;
use std::path::PathBuf;

/// Fundlens - startup funding analysis from a CSV dataset
///
/// Load a startup-funding CSV once and render an overall market
/// overview, a per-startup lookup, or a per-investor profile as a
/// Markdown or JSON report.
///
/// Examples:
///   fundlens --data startup_cleaned.csv
///   fundlens --data startup_cleaned.csv --view investor --investor "Tiger Global"
///   fundlens --data startup_cleaned.csv --view startup --startup BYJU'S --format json
///   fundlens --data startup_cleaned.csv --list investors
///   fundlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the funding CSV dataset
    ///
    /// Columns: Date, Startup, Vertical, city, investors, round, amount.
    /// Can also be set via FUNDLENS_DATA or the [data] section of
    /// .fundlens.toml.
    #[arg(short, long, value_name = "FILE", env = "FUNDLENS_DATA")]
    pub data: Option<PathBuf>,

    /// Which analysis view to render
    #[arg(long, default_value = "overall", value_name = "VIEW")]
    pub view: ViewMode,

    /// Startup name for the startup view (exact match)
    #[arg(long, value_name = "NAME")]
    pub startup: Option<String>,

    /// Investor name for the investor view
    ///
    /// Matched as a case-insensitive substring of the investors field,
    /// so "tiger" also matches "Tiger Global".
    #[arg(long, value_name = "NAME")]
    pub investor: Option<String>,

    /// Metric for the month-over-month trend (overall view)
    #[arg(long, default_value = "total", value_name = "METRIC")]
    pub metric: MetricArg,

    /// Number of startups in the biggest-investments table
    ///
    /// Default: from config or 5.
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Number of rows in the recent-investments table
    ///
    /// Default: from config or 5.
    #[arg(long, value_name = "COUNT")]
    pub recent: Option<usize>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report
    ///
    /// When omitted, the report is printed to stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// List selectable names and exit without building a report
    ///
    /// Values: startups (names with a known city), investors (the
    /// deduplicated roster of individual investor names).
    #[arg(long, value_name = "WHAT")]
    pub list: Option<ListTarget>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .fundlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .fundlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Analysis view to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewMode {
    /// Aggregate market overview (default)
    #[default]
    Overall,
    /// Per-startup lookup
    Startup,
    /// Per-investor profile
    Investor,
}

/// Metric choice for the month-over-month trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MetricArg {
    /// Sum of funding amounts per month (default)
    #[default]
    Total,
    /// Number of funded rounds per month
    Count,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Roster to list with --list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListTarget {
    /// Startups with a known city
    Startups,
    /// Deduplicated investor names
    Investors,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The aggregation metric requested on the command line.
    pub fn aggregation_metric(&self) -> Metric {
        match self.metric {
            MetricArg::Total => Metric::Sum,
            MetricArg::Count => Metric::Count,
        }
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.view == ViewMode::Startup && self.list.is_none() && self.startup.is_none() {
            return Err("--view startup requires --startup NAME".to_string());
        }

        if self.view == ViewMode::Investor && self.list.is_none() && self.investor.is_none() {
            return Err("--view investor requires --investor NAME".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate the dataset path if provided on the command line
        if let Some(ref data_path) = self.data {
            if !data_path.exists() {
                return Err(format!("Dataset file does not exist: {}", data_path.display()));
            }
            if !data_path.is_file() {
                return Err(format!("Dataset path is not a file: {}", data_path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
