//! View selection.
//!
//! Maps a user-chosen mode (overall / startup / investor) and its
//! parameters to the aggregation engine calls, and returns the complete
//! bundle of results that mode's screen needs. An unknown startup or
//! investor name yields an empty bundle with `found == false`, never an
//! error; the presentation layer renders the "no data" state.

use crate::analysis;
use crate::models::{BreakdownEntry, InvestmentRow, Metric, MonthPoint, OverviewStats, YearPoint};
use crate::store::Dataset;
use serde::Serialize;
use tracing::debug;

/// Aggregate bundle for the overall market view.
#[derive(Debug, Clone, Serialize)]
pub struct OverallView {
    /// Headline metrics.
    pub stats: OverviewStats,
    /// Which metric the trend series carries.
    pub metric: Metric,
    /// Month-over-month trend, chronologically ascending.
    pub mom: Vec<MonthPoint>,
}

/// Aggregate bundle for a single startup's screen.
#[derive(Debug, Clone, Serialize)]
pub struct StartupView {
    /// The queried startup name.
    pub name: String,
    /// Whether any records matched.
    pub found: bool,
    /// Headquarters city, when at least one record knows it.
    pub city: Option<String>,
    /// Total raised across all rounds, rounded for display.
    pub total: f64,
    /// Funding history, newest first.
    pub history: Vec<InvestmentRow>,
}

/// Aggregate bundle for a single investor's profile.
#[derive(Debug, Clone, Serialize)]
pub struct InvestorView {
    /// The queried investor name.
    pub name: String,
    /// Whether any records matched.
    pub found: bool,
    /// Most recent investments, newest first.
    pub recent: Vec<InvestmentRow>,
    /// Biggest investments by startup, descending.
    pub biggest: Vec<BreakdownEntry>,
    /// Sector distribution of the investor's funding.
    pub by_sector: Vec<BreakdownEntry>,
    /// City distribution of the investor's funding.
    pub by_city: Vec<BreakdownEntry>,
    /// Round distribution of the investor's funding.
    pub by_round: Vec<BreakdownEntry>,
    /// Yearly investment trend, ascending by year.
    pub yearly: Vec<YearPoint>,
}

/// Build the overall market view.
pub fn build_overall(dataset: &Dataset, metric: Metric) -> OverallView {
    let stats = OverviewStats {
        total: analysis::total_amount(dataset),
        max_funding: analysis::max_single_startup_funding(dataset),
        avg_funding: analysis::average_funding_per_startup(dataset),
        startup_count: analysis::distinct_startup_count(dataset),
    };

    OverallView {
        stats,
        metric,
        mom: analysis::month_over_month_series(dataset, metric),
    }
}

/// Build the per-startup view for `name` (exact match).
pub fn build_startup(dataset: &Dataset, name: &str) -> StartupView {
    let filtered = dataset.filter_by_startup(name);
    debug!("Startup '{}' matched {} records", name, filtered.len());

    let city = filtered
        .records()
        .iter()
        .find(|r| !r.city.is_empty())
        .map(|r| r.city.clone());

    let history = analysis::recent_n(&filtered, filtered.len());

    StartupView {
        name: name.to_string(),
        found: !filtered.is_empty(),
        city,
        total: analysis::total_amount(&filtered),
        history,
    }
}

/// Build the per-investor profile for `name`.
///
/// Matching is case-insensitive substring over the raw investors field,
/// so a roster entry like "Tiger Global" is found by "tiger".
pub fn build_investor(dataset: &Dataset, name: &str, top_n: usize, recent: usize) -> InvestorView {
    let filtered = dataset.filter_by_investor(name);
    debug!("Investor '{}' matched {} records", name, filtered.len());

    InvestorView {
        name: name.to_string(),
        found: !filtered.is_empty(),
        recent: analysis::recent_n(&filtered, recent),
        biggest: analysis::top_n_startups_by_total(&filtered, top_n),
        by_sector: analysis::sector_breakdown(&filtered),
        by_city: analysis::city_breakdown(&filtered),
        by_round: analysis::round_breakdown(&filtered),
        yearly: analysis::yearly_series(&filtered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FundingRecord;
    use chrono::NaiveDate;

    fn sample_dataset() -> Dataset {
        let record = |date: Option<(i32, u32, u32)>,
                      startup: &str,
                      vertical: &str,
                      city: &str,
                      investors: &str,
                      round: &str,
                      amount: Option<f64>| {
            FundingRecord {
                date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
                startup: startup.to_string(),
                vertical: vertical.to_string(),
                city: city.to_string(),
                investors: investors.to_string(),
                round: round.to_string(),
                amount,
            }
        };

        Dataset::from_records(vec![
            record(Some((2019, 1, 5)), "A", "E-Tech", "Pune", "X, Y", "Seed", Some(10.0)),
            record(Some((2020, 3, 10)), "A", "E-Tech", "Pune", "X", "Series A", Some(5.0)),
            record(None, "B", "Health", "", "Y", "Seed", Some(7.0)),
        ])
    }

    #[test]
    fn test_overall_view_bundle() {
        let view = build_overall(&sample_dataset(), Metric::Sum);

        assert_eq!(view.stats.total, 22.0);
        assert_eq!(view.stats.max_funding, 15.0);
        assert_eq!(view.stats.avg_funding, 11.0);
        assert_eq!(view.stats.startup_count, 2);
        assert_eq!(view.mom.len(), 2);
        assert_eq!(view.metric, Metric::Sum);
    }

    #[test]
    fn test_startup_view_known_name() {
        let view = build_startup(&sample_dataset(), "A");

        assert!(view.found);
        assert_eq!(view.city.as_deref(), Some("Pune"));
        assert_eq!(view.total, 15.0);
        assert_eq!(view.history.len(), 2);
        // Newest round first.
        assert_eq!(view.history[0].round, "Series A");
    }

    #[test]
    fn test_startup_view_unknown_name_is_empty_not_error() {
        let view = build_startup(&sample_dataset(), "Nope");

        assert!(!view.found);
        assert_eq!(view.city, None);
        assert_eq!(view.total, 0.0);
        assert!(view.history.is_empty());
    }

    #[test]
    fn test_startup_view_city_may_be_unknown() {
        let view = build_startup(&sample_dataset(), "B");

        assert!(view.found);
        assert_eq!(view.city, None);
        assert_eq!(view.total, 7.0);
    }

    #[test]
    fn test_investor_view_substring_match() {
        let view = build_investor(&sample_dataset(), "y", 5, 5);

        assert!(view.found);
        // Y backed both A's seed round and B.
        assert_eq!(view.recent.len(), 2);
        assert_eq!(view.biggest[0].label, "A");
        assert_eq!(view.biggest[0].total, 10.0);
        assert_eq!(view.by_round.len(), 1);
        assert_eq!(view.by_round[0].label, "Seed");
        assert_eq!(view.yearly.len(), 1);
        assert_eq!(view.yearly[0].year, 2019);
    }

    #[test]
    fn test_investor_view_unknown_name_is_empty_not_error() {
        let view = build_investor(&sample_dataset(), "SoftBank", 5, 5);

        assert!(!view.found);
        assert!(view.recent.is_empty());
        assert!(view.biggest.is_empty());
        assert!(view.by_sector.is_empty());
        assert!(view.yearly.is_empty());
    }
}
