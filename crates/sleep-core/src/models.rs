use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Result, SleepError};
use crate::formatting::format_clock_duration;

// ── RawRow ────────────────────────────────────────────────────────────────────

/// One spreadsheet row reduced to the three columns the reader cares about.
///
/// Cells that were empty or could not be interpreted are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based row number within the sheet.
    pub line: usize,
    /// Column 1: calendar date, optional (carried forward when absent).
    pub date: Option<NaiveDate>,
    /// Column 2: start time of day.
    pub start: Option<NaiveTime>,
    /// Column 3: end time of day.
    pub end: Option<NaiveTime>,
    /// Human-readable rendering of the raw cells, used in warnings.
    pub text: String,
}

impl RawRow {
    pub fn new(
        line: usize,
        date: Option<NaiveDate>,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> Self {
        let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        let text = format!(
            "{} | {} | {}",
            show(date.map(|d| d.to_string())),
            show(start.map(|t| t.to_string())),
            show(end.map(|t| t.to_string())),
        );
        Self {
            line,
            date,
            start,
            end,
            text,
        }
    }

    /// Replace the cell rendering with the verbatim spreadsheet text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

// ── SleepInterval ─────────────────────────────────────────────────────────────

/// A single contiguous sleep period.
///
/// Invariant: `end_instant >= start_instant`. When the end time of day is
/// earlier than the start time of day the end instant is moved to the next
/// calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepInterval {
    date: NaiveDate,
    start_instant: NaiveDateTime,
    end_instant: NaiveDateTime,
}

impl SleepInterval {
    /// Build an interval from a calendar date and two times of day.
    ///
    /// Fails with [`SleepError::InvalidInterval`] when any part is missing.
    pub fn new(
        date: Option<NaiveDate>,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> Result<Self> {
        let date = date.ok_or_else(|| SleepError::InvalidInterval("date missing".into()))?;
        let start = start.ok_or_else(|| SleepError::InvalidInterval("start time missing".into()))?;
        let end = end.ok_or_else(|| SleepError::InvalidInterval("end time missing".into()))?;

        let start_instant = date.and_time(start);
        let mut end_instant = date.and_time(end);
        if start_instant > end_instant {
            end_instant += Duration::days(1);
        }

        Ok(Self {
            date,
            start_instant,
            end_instant,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_instant(&self) -> NaiveDateTime {
        self.start_instant
    }

    pub fn end_instant(&self) -> NaiveDateTime {
        self.end_instant
    }

    /// Length of the interval in whole seconds, never negative.
    pub fn duration(&self) -> i64 {
        (self.end_instant - self.start_instant).num_seconds()
    }

    /// Whether `time` lies within the interval's time-of-day span.
    ///
    /// Both endpoints are inclusive. Intervals that cross midnight cover
    /// everything from the start time up to midnight and from midnight up to
    /// the end time. A plain `start <= time <= end` comparison would match
    /// nothing for such intervals, so this test is deliberately wrap-aware
    /// rather than a literal range check on the two times of day.
    pub fn covers_time_of_day(&self, time: NaiveTime) -> bool {
        let start = self.start_instant.time();
        let end = self.end_instant.time();
        if start <= end {
            start <= time && time <= end
        } else {
            time >= start || time <= end
        }
    }
}

impl fmt::Display for SleepInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: From {} to {}. Duration: {}.",
            self.date,
            self.start_instant,
            self.end_instant,
            format_clock_duration(self.duration())
        )
    }
}

// ── DayWindow ─────────────────────────────────────────────────────────────────

/// Which half of the day an interval is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    Day,
    Night,
}

/// Hour range `[start_day:00, start_night:00]` that counts as daytime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start_day: u8,
    pub start_night: u8,
}

impl DayWindow {
    pub fn new(start_day: u8, start_night: u8) -> Self {
        Self {
            start_day,
            start_night,
        }
    }

    /// Classify a start time of day. Both bounds are inclusive.
    pub fn classify(&self, time: NaiveTime) -> DayPart {
        let secs = time.num_seconds_from_midnight();
        let lower = u32::from(self.start_day) * 3600;
        let upper = u32::from(self.start_night) * 3600;
        if lower <= secs && secs <= upper {
            DayPart::Day
        } else {
            DayPart::Night
        }
    }
}

impl Default for DayWindow {
    fn default() -> Self {
        Self::new(8, 19)
    }
}

// ── DailyTotals ───────────────────────────────────────────────────────────────

/// Sleep seconds accumulated for one calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayTotals {
    pub total_seconds: i64,
    pub day_seconds: i64,
    pub night_seconds: i64,
}

impl DayTotals {
    /// Add `seconds` to the total and to the bucket for `part`.
    pub fn add(&mut self, seconds: i64, part: DayPart) {
        self.total_seconds += seconds;
        match part {
            DayPart::Day => self.day_seconds += seconds,
            DayPart::Night => self.night_seconds += seconds,
        }
    }
}

/// Per-date totals, ordered by calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTotals {
    days: BTreeMap<NaiveDate, DayTotals>,
}

impl DailyTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one interval's duration under `date`.
    pub fn record(&mut self, date: NaiveDate, seconds: i64, part: DayPart) {
        self.days.entry(date).or_default().add(seconds, part);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&DayTotals> {
        self.days.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayTotals)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sum of `total_seconds` over every date.
    pub fn total_seconds(&self) -> i64 {
        self.days.values().map(|d| d.total_seconds).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
