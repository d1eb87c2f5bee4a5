//! Data models for the funding analysis pipeline.
//!
//! This module contains all the core data structures used throughout
//! the application for representing funding records, aggregate series,
//! and breakdown entries.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metric to aggregate in the month-over-month trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Sum of funding amounts per group.
    #[default]
    Sum,
    /// Number of records with a known amount per group.
    Count,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Sum => write!(f, "Total"),
            Metric::Count => write!(f, "Count"),
        }
    }
}

/// Represents a single funding event.
///
/// Amounts are in crore. A missing or unparseable amount is `None` and is
/// excluded from every aggregate, never coerced to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingRecord {
    /// Date of the funding event, if it parsed.
    pub date: Option<NaiveDate>,
    /// Name of the funded startup.
    pub startup: String,
    /// Sector/industry classification (free text).
    pub vertical: String,
    /// Headquarters city. Empty string when absent in the source.
    pub city: String,
    /// Comma-separated investor names. Empty string when absent.
    pub investors: String,
    /// Funding round label (e.g. "Seed", "Series A").
    pub round: String,
    /// Funding amount in crore, if known.
    pub amount: Option<f64>,
}

impl FundingRecord {
    /// Month (1-12) of the funding date, if the date is known.
    pub fn month(&self) -> Option<u32> {
        self.date.map(|d| d.month())
    }

    /// Calendar year of the funding date, if the date is known.
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }

    /// Individual investor names: split on `,`, trimmed, empties dropped.
    pub fn investor_tokens(&self) -> Vec<&str> {
        self.investors
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Whether `name` appears in the raw investors field, case-insensitively.
    ///
    /// This is substring matching, so "Tiger" also matches "Tiger Global".
    pub fn mentions_investor(&self, name: &str) -> bool {
        self.investors
            .to_lowercase()
            .contains(&name.to_lowercase())
    }
}

/// One point in the month-over-month trend series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthPoint {
    /// Calendar year.
    pub year: i32,
    /// Month within the year (1-12).
    pub month: u32,
    /// Aggregated metric value (sum of amounts, or record count).
    pub value: f64,
}

impl MonthPoint {
    /// Axis label in the `month_year` form used by the trend table.
    pub fn label(&self) -> String {
        format!("{}_{}", self.month, self.year)
    }
}

/// One point in the yearly trend series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    /// Calendar year.
    pub year: i32,
    /// Total funding amount for the year.
    pub total: f64,
}

/// One entry in a categorical breakdown (by startup, sector, city, or round).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// Group label (free-text category value).
    pub label: String,
    /// Summed funding amount for the group.
    pub total: f64,
}

impl BreakdownEntry {
    /// Creates a new breakdown entry.
    pub fn new(label: impl Into<String>, total: f64) -> Self {
        Self {
            label: label.into(),
            total,
        }
    }
}

/// A funding record projected to the display columns of the recent-investments
/// table: `{date, startup, vertical, city, round, amount}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRow {
    /// Date of the funding event, if known.
    pub date: Option<NaiveDate>,
    /// Funded startup.
    pub startup: String,
    /// Sector classification.
    pub vertical: String,
    /// Headquarters city.
    pub city: String,
    /// Funding round label.
    pub round: String,
    /// Funding amount in crore, if known.
    pub amount: Option<f64>,
}

impl From<&FundingRecord> for InvestmentRow {
    fn from(record: &FundingRecord) -> Self {
        Self {
            date: record.date,
            startup: record.startup.clone(),
            vertical: record.vertical.clone(),
            city: record.city.clone(),
            round: record.round.clone(),
            amount: record.amount,
        }
    }
}

impl InvestmentRow {
    /// Date formatted for display, or a dash when unknown.
    pub fn date_display(&self) -> String {
        match self.date {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => "-".to_string(),
        }
    }

    /// Amount formatted for display, or a dash when unknown.
    pub fn amount_display(&self) -> String {
        match self.amount {
            Some(a) => format!("{} Cr", a),
            None => "-".to_string(),
        }
    }
}

/// Headline metrics for the overall market view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    /// Total funding across all records, rounded for display.
    pub total: f64,
    /// Largest total raised by a single startup across all its rounds.
    pub max_funding: f64,
    /// Mean of per-startup totals, rounded for display.
    pub avg_funding: f64,
    /// Number of distinct startups in the dataset.
    pub startup_count: usize,
}
