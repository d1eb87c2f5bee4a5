//! Funding aggregation and statistics.
//!
//! Pure, side-effect-free functions over a [`Dataset`]. Every function
//! returns a neutral value (0 or an empty sequence) on an empty table,
//! never an error.
//!
//! Amount policy: a record with an unknown amount is excluded from sums,
//! means, and counts, never coerced to zero. The policy is applied
//! uniformly across all aggregates, so any single-field breakdown still
//! partitions the grand total.

use crate::models::{BreakdownEntry, FundingRecord, InvestmentRow, Metric, MonthPoint, YearPoint};
use crate::store::Dataset;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Round a value for headline display.
///
/// Uses `f64::round` (half-away-from-zero), matching the source figures.
fn round_display(value: f64) -> f64 {
    value.round()
}

/// Per-group amount totals in first-encounter order.
///
/// Groups whose amounts are all unknown still appear, with a total of 0.
fn grouped_totals<'a, F>(dataset: &'a Dataset, key: F) -> Vec<(String, f64)>
where
    F: Fn(&'a FundingRecord) -> &'a str,
{
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for record in dataset.records() {
        let group = key(record);
        if !totals.contains_key(group) {
            order.push(group);
        }
        let entry = totals.entry(group).or_insert(0.0);
        if let Some(amount) = record.amount {
            *entry += amount;
        }
    }

    order
        .into_iter()
        .map(|group| (group.to_string(), totals[group]))
        .collect()
}

/// Breakdown by a categorical field, sorted descending by total.
///
/// Ties keep their first-encounter order (the sort is stable).
fn breakdown_by<'a, F>(dataset: &'a Dataset, key: F) -> Vec<BreakdownEntry>
where
    F: Fn(&'a FundingRecord) -> &'a str,
{
    let mut entries: Vec<BreakdownEntry> = grouped_totals(dataset, key)
        .into_iter()
        .map(|(label, total)| BreakdownEntry::new(label, total))
        .collect();

    entries.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

/// Sum of all known amounts, rounded for display.
pub fn total_amount(dataset: &Dataset) -> f64 {
    let total: f64 = dataset.records().iter().filter_map(|r| r.amount).sum();
    round_display(total)
}

/// Largest total raised by a single startup across all its rounds.
///
/// This is the maximum per-startup group sum, not a single record's amount.
pub fn max_single_startup_funding(dataset: &Dataset) -> f64 {
    grouped_totals(dataset, |r| r.startup.as_str())
        .into_iter()
        .map(|(_, total)| total)
        .fold(0.0, f64::max)
}

/// Mean of per-startup summed amounts, rounded for display.
///
/// Returns 0 when the table holds no startups.
pub fn average_funding_per_startup(dataset: &Dataset) -> f64 {
    let totals = grouped_totals(dataset, |r| r.startup.as_str());
    if totals.is_empty() {
        return 0.0;
    }

    let sum: f64 = totals.iter().map(|(_, total)| total).sum();
    round_display(sum / totals.len() as f64)
}

/// Number of distinct startup names in the table.
pub fn distinct_startup_count(dataset: &Dataset) -> usize {
    dataset
        .records()
        .iter()
        .map(|r| r.startup.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Month-over-month trend: one point per `(year, month)` group, sorted
/// ascending chronologically. Records with unknown dates are excluded.
pub fn month_over_month_series(dataset: &Dataset, metric: Metric) -> Vec<MonthPoint> {
    let mut groups: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for record in dataset.records() {
        let (Some(year), Some(month)) = (record.year(), record.month()) else {
            continue;
        };
        let Some(amount) = record.amount else {
            continue;
        };

        let entry = groups.entry((year, month)).or_insert(0.0);
        match metric {
            Metric::Sum => *entry += amount,
            Metric::Count => *entry += 1.0,
        }
    }

    groups
        .into_iter()
        .map(|((year, month), value)| MonthPoint { year, month, value })
        .collect()
}

/// Top `n` startups by total raised, descending, stable tie order.
pub fn top_n_startups_by_total(dataset: &Dataset, n: usize) -> Vec<BreakdownEntry> {
    let mut entries = breakdown_by(dataset, |r| r.startup.as_str());
    entries.truncate(n);
    entries
}

/// Funding totals by sector, descending.
pub fn sector_breakdown(dataset: &Dataset) -> Vec<BreakdownEntry> {
    breakdown_by(dataset, |r| r.vertical.as_str())
}

/// Funding totals by city, descending.
pub fn city_breakdown(dataset: &Dataset) -> Vec<BreakdownEntry> {
    breakdown_by(dataset, |r| r.city.as_str())
}

/// Funding totals by investment round, descending.
pub fn round_breakdown(dataset: &Dataset) -> Vec<BreakdownEntry> {
    breakdown_by(dataset, |r| r.round.as_str())
}

/// Funding totals by year, ascending by year (a trend-over-time view,
/// unlike the magnitude-sorted breakdowns). Undated records are excluded.
pub fn yearly_series(dataset: &Dataset) -> Vec<YearPoint> {
    let mut groups: BTreeMap<i32, f64> = BTreeMap::new();

    for record in dataset.records() {
        let Some(year) = record.year() else { continue };
        let Some(amount) = record.amount else { continue };
        *groups.entry(year).or_insert(0.0) += amount;
    }

    groups
        .into_iter()
        .map(|(year, total)| YearPoint { year, total })
        .collect()
}

/// The `n` most recent investments, newest first, unknown dates last,
/// projected to the display columns.
pub fn recent_n(dataset: &Dataset, n: usize) -> Vec<InvestmentRow> {
    let mut records: Vec<&FundingRecord> = dataset.records().iter().collect();

    records.sort_by(|a, b| match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    records.into_iter().take(n).map(InvestmentRow::from).collect()
}

/// The investor roster: every investor token across the table, trimmed,
/// deduplicated, sorted ascending.
///
/// Note the deliberate asymmetry with [`Dataset::filter_by_investor`]:
/// the roster is built from exact tokens of the comma split, while the
/// filter matches substrings.
pub fn distinct_investors(dataset: &Dataset) -> Vec<String> {
    let set: BTreeSet<String> = dataset
        .records()
        .iter()
        .flat_map(|r| r.investor_tokens())
        .map(str::to_string)
        .collect();

    set.into_iter().collect()
}

/// The startup roster: unique startups among records with a known (non-empty)
/// startup and city, sorted ascending.
pub fn distinct_startups_with_known_city(dataset: &Dataset) -> Vec<String> {
    let set: BTreeSet<&str> = dataset
        .records()
        .iter()
        .filter(|r| !r.startup.is_empty() && !r.city.is_empty())
        .map(|r| r.startup.as_str())
        .collect();

    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(
        date: Option<(i32, u32, u32)>,
        startup: &str,
        vertical: &str,
        city: &str,
        investors: &str,
        round: &str,
        amount: Option<f64>,
    ) -> FundingRecord {
        FundingRecord {
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            startup: startup.to_string(),
            vertical: vertical.to_string(),
            city: city.to_string(),
            investors: investors.to_string(),
            round: round.to_string(),
            amount,
        }
    }

    /// The known three-row sample: A raised 10 + 5, B raised 7 (bad date).
    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            record(Some((2019, 1, 5)), "A", "E-Tech", "Pune", "X, Y", "Seed", Some(10.0)),
            record(Some((2020, 3, 10)), "A", "E-Tech", "Pune", "X", "Series A", Some(5.0)),
            record(None, "B", "Health", "", "Y", "Seed", Some(7.0)),
        ])
    }

    #[test]
    fn test_sample_headline_metrics() {
        let dataset = sample_dataset();

        assert_eq!(total_amount(&dataset), 22.0);
        assert_eq!(distinct_startup_count(&dataset), 2);
        assert_eq!(max_single_startup_funding(&dataset), 15.0);
        // (15 + 7) / 2 = 11
        assert_eq!(average_funding_per_startup(&dataset), 11.0);
    }

    #[test]
    fn test_missing_amounts_are_excluded_not_zeroed() {
        let dataset = Dataset::from_records(vec![
            record(Some((2019, 1, 1)), "A", "E-Tech", "Pune", "X", "Seed", Some(10.0)),
            record(Some((2019, 2, 1)), "A", "E-Tech", "Pune", "X", "Seed", None),
        ]);

        assert_eq!(total_amount(&dataset), 10.0);
        assert_eq!(max_single_startup_funding(&dataset), 10.0);
        // The None row adds nothing to the count metric either.
        let counts = month_over_month_series(&dataset, Metric::Count);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].value, 1.0);
    }

    #[test]
    fn test_breakdowns_partition_the_total() {
        let dataset = sample_dataset();
        let grand_total: f64 = dataset.records().iter().filter_map(|r| r.amount).sum();

        for breakdown in [
            sector_breakdown(&dataset),
            city_breakdown(&dataset),
            round_breakdown(&dataset),
        ] {
            let sum: f64 = breakdown.iter().map(|e| e.total).sum();
            assert!((sum - grand_total).abs() < 1e-9);
        }
    }

    #[test]
    fn test_breakdown_sorted_descending() {
        let dataset = sample_dataset();
        let rounds = round_breakdown(&dataset);

        assert_eq!(rounds[0].label, "Seed");
        assert_eq!(rounds[0].total, 17.0);
        assert_eq!(rounds[1].label, "Series A");
        for pair in rounds.windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn test_top_n_length_and_order() {
        let dataset = sample_dataset();

        let top = top_n_startups_by_total(&dataset, 5);
        assert_eq!(top.len(), 2); // min(n, distinct startups)
        assert_eq!(top[0].label, "A");
        assert_eq!(top[0].total, 15.0);
        assert_eq!(top[1].label, "B");

        let top1 = top_n_startups_by_total(&dataset, 1);
        assert_eq!(top1.len(), 1);
        assert_eq!(top1[0].label, "A");

        assert!(top_n_startups_by_total(&dataset, 0).is_empty());
    }

    #[test]
    fn test_top_n_ties_keep_first_encounter_order() {
        let dataset = Dataset::from_records(vec![
            record(None, "Zed", "E", "P", "X", "Seed", Some(5.0)),
            record(None, "Alpha", "E", "P", "X", "Seed", Some(5.0)),
        ]);

        let top = top_n_startups_by_total(&dataset, 2);
        assert_eq!(top[0].label, "Zed");
        assert_eq!(top[1].label, "Alpha");
    }

    #[test]
    fn test_month_over_month_sorted_chronologically() {
        let dataset = Dataset::from_records(vec![
            record(Some((2020, 1, 1)), "A", "E", "P", "X", "Seed", Some(3.0)),
            record(Some((2019, 12, 1)), "B", "E", "P", "X", "Seed", Some(2.0)),
            record(Some((2019, 12, 20)), "C", "E", "P", "X", "Seed", Some(4.0)),
            record(None, "D", "E", "P", "X", "Seed", Some(9.0)),
        ]);

        let sums = month_over_month_series(&dataset, Metric::Sum);
        assert_eq!(sums.len(), 2);
        assert_eq!((sums[0].year, sums[0].month, sums[0].value), (2019, 12, 6.0));
        assert_eq!((sums[1].year, sums[1].month, sums[1].value), (2020, 1, 3.0));

        let counts = month_over_month_series(&dataset, Metric::Count);
        assert_eq!(counts[0].value, 2.0);
        assert_eq!(counts[1].value, 1.0);
    }

    #[test]
    fn test_yearly_series_ascending_no_duplicates() {
        let dataset = Dataset::from_records(vec![
            record(Some((2021, 5, 1)), "A", "E", "P", "X", "Seed", Some(1.0)),
            record(Some((2019, 1, 1)), "B", "E", "P", "X", "Seed", Some(2.0)),
            record(Some((2021, 7, 1)), "C", "E", "P", "X", "Seed", Some(3.0)),
        ]);

        let series = yearly_series(&dataset);
        assert_eq!(series.len(), 2);
        assert_eq!((series[0].year, series[0].total), (2019, 2.0));
        assert_eq!((series[1].year, series[1].total), (2021, 4.0));
    }

    #[test]
    fn test_recent_n_newest_first_unknown_dates_last() {
        let dataset = sample_dataset();
        let recent = recent_n(&dataset, 5);

        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].round, "Series A"); // 2020-03-10
        assert_eq!(recent[1].round, "Seed"); // 2019-01-05
        assert_eq!(recent[2].date, None); // bad date last

        let top2 = recent_n(&dataset, 2);
        assert_eq!(top2.len(), 2);
    }

    #[test]
    fn test_distinct_investors_roster() {
        let dataset = Dataset::from_records(vec![
            record(None, "A", "E", "P", " X , Y ", "Seed", Some(1.0)),
            record(None, "B", "E", "P", "Y", "Seed", Some(1.0)),
            record(None, "C", "E", "P", "", "Seed", Some(1.0)),
        ]);

        let roster = distinct_investors(&dataset);
        assert_eq!(roster, vec!["X", "Y"]);
        assert!(roster.iter().all(|name| name == name.trim() && !name.is_empty()));
    }

    #[test]
    fn test_startup_roster_requires_known_city() {
        let dataset = sample_dataset();
        // B has an empty city, so only A qualifies.
        assert_eq!(distinct_startups_with_known_city(&dataset), vec!["A"]);
    }

    #[test]
    fn test_empty_dataset_neutral_values() {
        let dataset = Dataset::default();

        assert_eq!(total_amount(&dataset), 0.0);
        assert_eq!(max_single_startup_funding(&dataset), 0.0);
        assert_eq!(average_funding_per_startup(&dataset), 0.0);
        assert_eq!(distinct_startup_count(&dataset), 0);
        assert!(month_over_month_series(&dataset, Metric::Sum).is_empty());
        assert!(top_n_startups_by_total(&dataset, 5).is_empty());
        assert!(sector_breakdown(&dataset).is_empty());
        assert!(city_breakdown(&dataset).is_empty());
        assert!(round_breakdown(&dataset).is_empty());
        assert!(yearly_series(&dataset).is_empty());
        assert!(recent_n(&dataset, 5).is_empty());
        assert!(distinct_investors(&dataset).is_empty());
        assert!(distinct_startups_with_known_city(&dataset).is_empty());
    }
}
