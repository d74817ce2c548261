//! Per-date sleep totals and the overall average.

use sleep_core::error::{Result, SleepError};
use sleep_core::models::{DailyTotals, DayWindow, SleepInterval};
use tracing::debug;

// ── SleepAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups intervals by calendar date.
pub struct SleepAggregator;

impl SleepAggregator {
    /// Sum interval durations per date, split into day and night by the
    /// interval's start time of day.
    pub fn calculate_totals(intervals: &[SleepInterval], window: DayWindow) -> DailyTotals {
        let mut totals = DailyTotals::new();

        for interval in intervals {
            let part = window.classify(interval.start_instant().time());
            totals.record(interval.date(), interval.duration(), part);
        }

        debug!(
            "Aggregated {} intervals into {} dates",
            intervals.len(),
            totals.len()
        );
        totals
    }

    /// Mean of the per-date totals, in seconds.
    ///
    /// Fails with [`SleepError::NoData`] when `totals` is empty.
    pub fn calculate_average(totals: &DailyTotals) -> Result<f64> {
        if totals.is_empty() {
            return Err(SleepError::NoData);
        }
        Ok(totals.total_seconds() as f64 / totals.len() as f64)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
