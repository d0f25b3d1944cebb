use chrono::{Days, NaiveDate};

use crate::services::histogram::build_histogram;
use crate::services::percentiles::value_f64_sorted;
use crate::services::simulation_types::{ConfidenceLevel, ConfidenceResult};

pub const DEFAULT_BIN_COUNT: usize = 10;

/// Summarises trial totals into P20/P50/P90 confidence levels and a histogram.
/// `results` is left untouched; a sorted copy is used internally.
pub fn reduce(results: &[f64], start_date: NaiveDate, bin_count: usize) -> ConfidenceResult {
    let mut sorted = results.to_vec();
    sorted.sort_by(f64::total_cmp);
    reduce_sorted(&sorted, start_date, bin_count)
}

/// Same as [`reduce`] for results already sorted in ascending order.
pub fn reduce_sorted(sorted: &[f64], start_date: NaiveDate, bin_count: usize) -> ConfidenceResult {
    let confidence = ConfidenceResult {
        trials: sorted.len(),
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
        p20: confidence_level(sorted, 0.2, start_date),
        p50: confidence_level(sorted, 0.5, start_date),
        p90: confidence_level(sorted, 0.9, start_date),
        histogram: build_histogram(sorted, bin_count),
    };
    tracing::debug!(
        trials = confidence.trials,
        p20 = confidence.p20.days,
        p50 = confidence.p50.days,
        p90 = confidence.p90.days,
        "reduced simulation results"
    );
    confidence
}

fn confidence_level(sorted: &[f64], quantile: f64, start_date: NaiveDate) -> ConfidenceLevel {
    let days = value_f64_sorted(sorted, quantile);
    let rounded_days = days.ceil().max(0.0) as u64;
    ConfidenceLevel {
        days,
        rounded_days,
        date: end_date_from_days(start_date, rounded_days),
    }
}

/// Calendar date `days` after `start_date`, saturating at the last
/// representable date.
pub fn end_date_from_days(start_date: NaiveDate, days: u64) -> NaiveDate {
    start_date
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}
