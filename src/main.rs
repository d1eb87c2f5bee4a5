//! Fundlens - Startup Funding Analysis
//!
//! A CLI tool that loads a startup-funding CSV once at startup and
//! renders an overall market overview, a per-startup lookup, or a
//! per-investor profile as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable dataset, config failure, etc.)
//!   2 - Requested startup/investor has no records in the dataset

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod store;
mod view;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, ListTarget, OutputFormat, ViewMode};
use config::Config;
use report::{Report, ReportMetadata, ViewReport};
use store::Dataset;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Fundlens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run_analysis(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .fundlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".fundlens.toml");

    if path.exists() {
        eprintln!("⚠️  .fundlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .fundlens.toml")?;

    println!("✅ Created .fundlens.toml with default settings.");
    println!("   Edit it to set the dataset path and report sizes.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow. Returns exit code (0 or 2).
fn run_analysis(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Load the dataset (once; it is immutable afterwards)
    let data_path = config
        .dataset_path()
        .context("No dataset path. Pass --data FILE or set `path` under [data] in .fundlens.toml")?
        .to_path_buf();

    let dataset = Dataset::load(&data_path)?;
    info!(
        "Loaded {} records from {}",
        dataset.len(),
        data_path.display()
    );

    // Handle --list: print the roster and exit
    if let Some(target) = args.list {
        return handle_list(&dataset, target);
    }

    // Step 2: Build the requested view
    let body = match args.view {
        ViewMode::Overall => {
            ViewReport::Overall(view::build_overall(&dataset, args.aggregation_metric()))
        }
        ViewMode::Startup => {
            // Presence was checked by Args::validate.
            let name = args.startup.as_deref().unwrap_or("");
            ViewReport::Startup(view::build_startup(&dataset, name))
        }
        ViewMode::Investor => {
            let name = args.investor.as_deref().unwrap_or("");
            ViewReport::Investor(view::build_investor(
                &dataset,
                name,
                config.report.top_startups,
                config.report.recent_investments,
            ))
        }
    };

    let found = match &body {
        ViewReport::Overall(_) => true,
        ViewReport::Startup(v) => v.found,
        ViewReport::Investor(v) => v.found,
    };
    if !found {
        warn!("No matching records for the requested selection");
    }

    // Step 3: Render the report
    let report = Report {
        metadata: ReportMetadata {
            dataset: data_path.display().to_string(),
            generated_at: Utc::now(),
            record_count: dataset.len(),
        },
        body,
    };

    let output = match args.format {
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report saved to: {}", path.display());
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(if found { 0 } else { 2 })
}

/// Handle --list: print the requested roster, one name per line.
fn handle_list(dataset: &Dataset, target: ListTarget) -> Result<i32> {
    let names = match target {
        ListTarget::Startups => analysis::distinct_startups_with_known_city(dataset),
        ListTarget::Investors => analysis::distinct_investors(dataset),
    };

    if names.is_empty() {
        println!("No entries.");
    } else {
        for name in &names {
            println!("{}", name);
        }
        info!("{} names listed", names.len());
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .fundlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
