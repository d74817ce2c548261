//! Time-of-day histogram over a synthetic 24-hour reference day.
//!
//! The day is walked in `raster` minute steps. Every interval covering a
//! sampled instant contributes one occurrence of that instant; the
//! occurrences are then binned into `1440 / resolution` equal-width bins.

use chrono::{NaiveTime, Timelike};
use sleep_core::error::Result;
use sleep_core::models::SleepInterval;
use tracing::debug;

const SECONDS_PER_DAY: u32 = 86_400;
const MINUTES_PER_DAY: u32 = 1_440;

/// Sample the reference day every `raster` minutes, from 00:00 inclusive to
/// 24:00 exclusive, and record one occurrence per covering interval.
///
/// Cost is O(intervals × samples); 288 samples per interval at the default
/// 5 minute raster.
pub fn sample_occurrences(intervals: &[SleepInterval], raster_minutes: u32) -> Vec<NaiveTime> {
    let step = raster_minutes.max(1) * 60;
    let mut occurrences = Vec::new();

    for secs in (0..SECONDS_PER_DAY).step_by(step as usize) {
        let Some(sample) = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0) else {
            continue;
        };
        let covering = intervals
            .iter()
            .filter(|i| i.covers_time_of_day(sample))
            .count();
        occurrences.extend(std::iter::repeat(sample).take(covering));
    }

    occurrences
}

/// Number of bins for a given bin width in minutes, at least one.
pub fn bin_count_for_resolution(resolution_minutes: u32) -> usize {
    (MINUTES_PER_DAY / resolution_minutes.max(1)).max(1) as usize
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// Occurrence counts in equal-width bins spanning 00:00–24:00.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    /// Bin `occurrences` into `bin_count` equal-width bins.
    pub fn from_occurrences(occurrences: &[NaiveTime], bin_count: usize) -> Self {
        let bin_count = bin_count.max(1);
        let mut counts = vec![0u64; bin_count];

        for t in occurrences {
            let secs = u64::from(t.num_seconds_from_midnight());
            let index = (secs * bin_count as u64 / u64::from(SECONDS_PER_DAY)) as usize;
            counts[index.min(bin_count - 1)] += 1;
        }

        Self { counts }
    }

    /// Sample and bin `intervals` in one step.
    pub fn build(intervals: &[SleepInterval], raster_minutes: u32, resolution_minutes: u32) -> Self {
        let occurrences = sample_occurrences(intervals, raster_minutes);
        let histogram =
            Self::from_occurrences(&occurrences, bin_count_for_resolution(resolution_minutes));
        debug!(
            "Histogram: {} occurrences in {} bins",
            occurrences.len(),
            histogram.bin_count()
        );
        histogram
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Width of one bin in minutes.
    pub fn bin_width_minutes(&self) -> f64 {
        f64::from(MINUTES_PER_DAY) / self.counts.len() as f64
    }

    /// Start of bin `index` in minutes after midnight.
    pub fn bin_start_minutes(&self, index: usize) -> f64 {
        index as f64 * self.bin_width_minutes()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

// ── Display collaborator ──────────────────────────────────────────────────────

/// Something that can present a histogram to the user.
pub trait HistogramDisplay {
    fn show(&mut self, histogram: &Histogram) -> Result<()>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
