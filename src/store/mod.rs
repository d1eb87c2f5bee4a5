//! Dataset loading and normalization.
//!
//! This module turns the raw startup-funding CSV into an immutable,
//! in-memory table of [`FundingRecord`]s. The load happens once at
//! process start; a malformed row never fails the whole load, it only
//! degrades that row's fields.

use crate::models::FundingRecord;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Column names as they appear in the source CSV (case-sensitive).
const REQUIRED_COLUMNS: [&str; 7] = [
    "Date",
    "Startup",
    "Vertical",
    "city",
    "investors",
    "round",
    "amount",
];

/// Date formats accepted by the loader. Anything else degrades to `None`.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Counters describing how the load went.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadStats {
    /// Data rows read from the file (excluding the header).
    pub rows_read: usize,
    /// Rows whose date failed to parse (kept, with a null date).
    pub bad_dates: usize,
    /// Rows whose amount was missing or invalid (kept, with a null amount).
    pub bad_amounts: usize,
    /// Rows the CSV reader could not parse at all (skipped).
    pub unreadable_rows: usize,
}

/// Immutable in-memory table of funding records.
///
/// Constructed once at startup and only ever read afterwards. Filtered
/// views are new `Dataset` values; nothing mutates the underlying rows.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<FundingRecord>,
}

impl Dataset {
    /// Builds a dataset directly from records (used by filters and tests).
    pub fn from_records(records: Vec<FundingRecord>) -> Self {
        Self { records }
    }

    /// Loads and normalizes the funding CSV at `path`.
    ///
    /// Fails only when the file is unreadable or the header is missing a
    /// required column. Row-level problems are logged and degraded:
    /// unparseable dates become `None`, missing city/investors become `""`,
    /// and missing amounts become `None`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read CSV headers: {}", path.display()))?
            .clone();

        let columns = build_column_map(&headers)?;

        let mut records = Vec::new();
        let mut stats = LoadStats::default();

        for (idx, result) in reader.records().enumerate() {
            // Header is line 1, so data rows start at line 2.
            let line = idx + 2;
            stats.rows_read += 1;

            let raw = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping unreadable row at line {}: {}", line, e);
                    stats.unreadable_rows += 1;
                    continue;
                }
            };

            records.push(parse_row(&raw, &columns, line, &mut stats));
        }

        debug!(
            "Loaded {} records ({} bad dates, {} bad amounts, {} unreadable rows)",
            records.len(),
            stats.bad_dates,
            stats.bad_amounts,
            stats.unreadable_rows
        );

        Ok(Self { records })
    }

    /// All records, in file order.
    pub fn records(&self) -> &[FundingRecord] {
        &self.records
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view of the records whose raw `investors` field contains
    /// `name` as a case-insensitive substring.
    ///
    /// Substring on purpose: a query for "Tiger" also matches "Tiger Global".
    pub fn filter_by_investor(&self, name: &str) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|r| r.mentions_investor(name))
            .cloned()
            .collect();
        Dataset::from_records(records)
    }

    /// Read-only view of the records for one startup (exact name match).
    pub fn filter_by_startup(&self, name: &str) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|r| r.startup == name)
            .cloned()
            .collect();
        Dataset::from_records(records)
    }
}

/// Map column name to index, verifying the required schema.
fn build_column_map(headers: &StringRecord) -> Result<HashMap<String, usize>> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        // Excel-exported CSVs sometimes carry a BOM on the first header.
        .map(|(idx, name)| (name.trim_start_matches('\u{feff}').to_string(), idx))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !map.contains_key(column) {
            bail!("Missing required column: `{}`", column);
        }
    }

    Ok(map)
}

/// Parse one CSV row into a record, degrading bad fields instead of failing.
fn parse_row(
    raw: &StringRecord,
    columns: &HashMap<String, usize>,
    line: usize,
    stats: &mut LoadStats,
) -> FundingRecord {
    let field = |name: &str| -> &str {
        columns
            .get(name)
            .and_then(|idx| raw.get(*idx))
            .map(str::trim)
            .unwrap_or("")
    };

    let date_raw = field("Date");
    let date = parse_date(date_raw);
    if date.is_none() && !date_raw.is_empty() {
        debug!("Unparseable date '{}' at line {}", date_raw, line);
    }
    if date.is_none() {
        stats.bad_dates += 1;
    }

    let amount_raw = field("amount");
    let amount = parse_amount(amount_raw);
    if amount.is_none() {
        if !amount_raw.is_empty() {
            debug!("Invalid amount '{}' at line {}", amount_raw, line);
        }
        stats.bad_amounts += 1;
    }

    FundingRecord {
        date,
        startup: field("Startup").to_string(),
        vertical: field("Vertical").to_string(),
        // Missing raw values become "", never a null sentinel, so the
        // split/contains operations downstream always work.
        city: field("city").to_string(),
        investors: field("investors").to_string(),
        round: field("round").to_string(),
        amount,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Amounts must be finite and non-negative; anything else is unknown.
fn parse_amount(s: &str) -> Option<f64> {
    let value = s.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}
