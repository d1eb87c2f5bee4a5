//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.fundlens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the funding CSV. The CLI `--data` flag takes precedence.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of startups in the biggest-investments table.
    #[serde(default = "default_top_startups")]
    pub top_startups: usize,

    /// Number of rows in the recent-investments table.
    #[serde(default = "default_recent_investments")]
    pub recent_investments: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_startups: default_top_startups(),
            recent_investments: default_recent_investments(),
        }
    }
}

fn default_top_startups() -> usize {
    5
}

fn default_recent_investments() -> usize {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".fundlens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = Some(data.clone());
        }

        if let Some(top) = args.top {
            self.report.top_startups = top;
        }
        if let Some(recent) = args.recent {
            self.report.recent_investments = recent;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// The resolved dataset path, if any source provided one.
    pub fn dataset_path(&self) -> Option<&Path> {
        self.data.path.as_deref()
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
