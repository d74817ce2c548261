//! Conversion of spreadsheet cell contents into dates and times of day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Day zero of the spreadsheet serial date system.
fn serial_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Convert a spreadsheet serial number (days since 1899-12-30, fraction =
/// time of day) into a timestamp, rounded to the nearest second.
///
/// Returns `None` for negative or non-finite serials and for serials beyond
/// the representable date range.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let seconds = (serial * SECONDS_PER_DAY).round() as i64;
    let offset = Duration::try_seconds(seconds)?;
    serial_epoch()?.checked_add_signed(offset)
}

/// Time-of-day part of a spreadsheet serial.
pub fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    serial_to_datetime(serial).map(|dt| dt.time())
}

/// Calendar-date part of a spreadsheet serial.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    serial_to_datetime(serial).map(|dt| dt.date())
}

/// Parse a textual date cell. Full timestamps are accepted and truncated to
/// their date.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    debug!("unrecognised date text \"{}\"", s);
    None
}

/// Parse a textual time cell. Full timestamps are accepted and reduced to
/// their time of day.
pub fn parse_time_text(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.time());
        }
    }
    debug!("unrecognised time text \"{}\"", s);
    None
}
