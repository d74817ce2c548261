//! Printable summary of one run: per-date totals plus the overall average.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::formatting::{format_average_hours, format_hours};
use crate::models::DailyTotals;

/// Totals for one calendar date as they appear in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub day_seconds: i64,
    pub night_seconds: i64,
    pub total_seconds: i64,
}

/// The full report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepReport {
    pub days: Vec<DayReport>,
    pub average_seconds: f64,
    pub skipped_rows: usize,
}

impl SleepReport {
    pub fn new(totals: &DailyTotals, average_seconds: f64, skipped_rows: usize) -> Self {
        let days = totals
            .iter()
            .map(|(date, t)| DayReport {
                date: *date,
                day_seconds: t.day_seconds,
                night_seconds: t.night_seconds,
                total_seconds: t.total_seconds,
            })
            .collect();
        Self {
            days,
            average_seconds,
            skipped_rows,
        }
    }

    /// One line per date followed by the average line.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .days
            .iter()
            .map(|d| {
                format!(
                    "{} : Day: {}, Night: {}, Total: {}",
                    d.date,
                    format_hours(d.day_seconds),
                    format_hours(d.night_seconds),
                    format_hours(d.total_seconds)
                )
            })
            .collect();
        lines.push(format!(
            "Average sleep time: {}",
            format_average_hours(self.average_seconds)
        ));
        lines
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayPart;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_totals() -> DailyTotals {
        let mut totals = DailyTotals::new();
        totals.record(date("2024-03-01"), 28_800, DayPart::Night);
        totals.record(date("2024-03-02"), 5_400, DayPart::Day);
        totals.record(date("2024-03-02"), 21_600, DayPart::Night);
        totals
    }

    #[test]
    fn test_text_lines() {
        let report = SleepReport::new(&sample_totals(), 27_900.0, 0);
        assert_eq!(
            report.text_lines(),
            vec![
                "2024-03-01 : Day: 00.0h, Night: 08.0h, Total: 08.0h".to_string(),
                "2024-03-02 : Day: 01.5h, Night: 06.0h, Total: 07.5h".to_string(),
                "Average sleep time: 7.8h".to_string(),
            ]
        );
    }

    #[test]
    fn test_json_output() {
        let report = SleepReport::new(&sample_totals(), 27_900.0, 2);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["days"].as_array().unwrap().len(), 2);
        assert_eq!(json["days"][0]["date"], "2024-03-01");
        assert_eq!(json["days"][0]["night_seconds"], 28_800);
        assert_eq!(json["days"][1]["total_seconds"], 27_000);
        assert_eq!(json["average_seconds"], 27_900.0);
        assert_eq!(json["skipped_rows"], 2);
    }
}
