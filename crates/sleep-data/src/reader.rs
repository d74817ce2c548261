//! Spreadsheet loading for sleepgraph.
//!
//! Reads `(date, start, end)` rows from the first worksheet of an xlsx
//! workbook and turns them into [`SleepInterval`]s, carrying the last seen
//! date forward over rows that leave the date column empty.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveTime};
use sleep_core::error::{Result, SleepError};
use sleep_core::models::{RawRow, SleepInterval};
use sleep_core::time_utils::{parse_date_text, parse_time_text, serial_to_date, serial_to_time};
use tracing::{debug, info};

const DATE_COLUMN: usize = 0;
const START_COLUMN: usize = 1;
const END_COLUMN: usize = 2;

// ── RowSource ─────────────────────────────────────────────────────────────────

/// Anything that can produce the ordered rows of a sleep log.
pub trait RowSource {
    fn read_rows(&mut self) -> Result<Vec<RawRow>>;
}

/// In-memory rows, consumed on first read.
impl RowSource for Vec<RawRow> {
    fn read_rows(&mut self) -> Result<Vec<RawRow>> {
        Ok(std::mem::take(self))
    }
}

/// An xlsx workbook opened from disk.
pub struct XlsxSource {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
}

impl XlsxSource {
    /// Open the workbook at `path`.
    ///
    /// Fails with [`SleepError::SourceUnavailable`] when the file is missing
    /// or is not a readable workbook.
    pub fn open(path: &Path) -> Result<Self> {
        let workbook: Xlsx<_> = open_workbook(path).map_err(|e| unavailable(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl RowSource for XlsxSource {
    fn read_rows(&mut self) -> Result<Vec<RawRow>> {
        let range = match self.workbook.worksheet_range_at(0) {
            Some(Ok(range)) => range,
            Some(Err(e)) => return Err(unavailable(&self.path, e)),
            None => return Err(unavailable(&self.path, "workbook has no worksheets")),
        };

        let (first_row, first_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let rows = range
            .rows()
            .enumerate()
            .map(|(i, cells)| row_from_cells(first_row + i + 1, cells, first_col))
            .collect::<Vec<_>>();

        debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

fn unavailable(path: &Path, reason: impl fmt::Display) -> SleepError {
    SleepError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

// ── Cell conversion ───────────────────────────────────────────────────────────

fn cell(cells: &[Data], column: usize, first_col: usize) -> Option<&Data> {
    column.checked_sub(first_col).and_then(|i| cells.get(i))
}

fn cell_date(cell: Option<&Data>) -> Option<NaiveDate> {
    match cell? {
        Data::DateTime(dt) => serial_to_date(dt.as_f64()),
        Data::Float(f) => serial_to_date(*f),
        Data::Int(i) => serial_to_date(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        _ => None,
    }
}

fn cell_time(cell: Option<&Data>) -> Option<NaiveTime> {
    match cell? {
        Data::DateTime(dt) => serial_to_time(dt.as_f64()),
        Data::Float(f) => serial_to_time(*f),
        Data::Int(i) => serial_to_time(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_time_text(s),
        _ => None,
    }
}

/// Reduce one sheet row to a fixed-shape [`RawRow`].
pub(crate) fn row_from_cells(line: usize, cells: &[Data], first_col: usize) -> RawRow {
    let text = [DATE_COLUMN, START_COLUMN, END_COLUMN]
        .iter()
        .map(|&c| cell(cells, c, first_col).map(|d| d.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" | ");

    RawRow::new(
        line,
        cell_date(cell(cells, DATE_COLUMN, first_col)),
        cell_time(cell(cells, START_COLUMN, first_col)),
        cell_time(cell(cells, END_COLUMN, first_col)),
    )
    .with_text(text)
}

// ── Ingestion ─────────────────────────────────────────────────────────────────

/// A row that did not produce an interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: usize,
    pub text: String,
    pub reason: String,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid data: row {} ({}): {}. ignoring line.",
            self.line, self.text, self.reason
        )
    }
}

/// Result of reading a sleep log: the valid intervals in file order plus
/// every row that was skipped.
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    pub intervals: Vec<SleepInterval>,
    pub skipped: Vec<SkippedRow>,
}

/// Build intervals from rows in order.
///
/// A non-empty date updates the carried date even when the rest of its row
/// is unusable. Rows missing a start or end time are skipped, as are rows
/// for which no date has been seen yet.
pub fn build_intervals(rows: Vec<RawRow>) -> ReadOutcome {
    let mut outcome = ReadOutcome::default();
    let mut last_date: Option<NaiveDate> = None;

    for row in rows {
        if row.date.is_some() {
            last_date = row.date;
        }

        let skip = |reason: String| SkippedRow {
            line: row.line,
            text: row.text.clone(),
            reason,
        };

        if row.start.is_none() || row.end.is_none() {
            debug!("row {}: start or end time missing", row.line);
            outcome.skipped.push(skip("start or end time missing".to_string()));
            continue;
        }

        match SleepInterval::new(last_date, row.start, row.end) {
            Ok(interval) => outcome.intervals.push(interval),
            Err(e) => {
                debug!("row {}: {}", row.line, e);
                outcome.skipped.push(skip(e.to_string()));
            }
        }
    }

    outcome
}

/// Read every row from `source` and build intervals from them.
pub fn read_intervals<S: RowSource + ?Sized>(source: &mut S) -> Result<ReadOutcome> {
    let rows = source.read_rows()?;
    let total = rows.len();
    let outcome = build_intervals(rows);
    info!(
        "Loaded {} intervals from {} rows ({} skipped)",
        outcome.intervals.len(),
        total,
        outcome.skipped.len()
    );
    Ok(outcome)
}

/// Open the workbook at `path` and read its intervals.
pub fn load_workbook(path: &Path) -> Result<ReadOutcome> {
    let mut source = XlsxSource::open(path)?;
    read_intervals(&mut source)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn row(line: usize, d: Option<&str>, start: Option<&str>, end: Option<&str>) -> RawRow {
        RawRow::new(line, d.map(date), start.map(time), end.map(time))
    }

    // ── build_intervals ───────────────────────────────────────────────────────

    #[test]
    fn test_carry_forward_reuses_last_date() {
        let rows = vec![
            row(1, Some("2024-01-01"), Some("23:00"), Some("23:30")),
            row(2, None, Some("23:45"), Some("23:50")),
        ];
        let outcome = build_intervals(rows);

        assert_eq!(outcome.intervals.len(), 2);
        assert_eq!(outcome.intervals[1].date(), date("2024-01-01"));
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_row_missing_start_is_skipped() {
        let rows = vec![
            row(1, Some("2024-01-01"), Some("22:00"), Some("06:00")),
            row(2, None, None, Some("07:00")),
            row(3, None, Some("13:00"), Some("14:00")),
        ];
        let outcome = build_intervals(rows);

        assert_eq!(outcome.intervals.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].line, 2);
        assert_eq!(outcome.intervals[1].date(), date("2024-01-01"));
    }

    #[test]
    fn test_dated_row_missing_end_still_updates_carried_date() {
        let rows = vec![
            row(1, Some("2024-01-01"), Some("22:00"), Some("06:00")),
            row(2, Some("2024-01-02"), Some("22:00"), None),
            row(3, None, Some("13:00"), Some("14:00")),
        ];
        let outcome = build_intervals(rows);

        assert_eq!(outcome.intervals.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.intervals[1].date(), date("2024-01-02"));
    }

    #[test]
    fn test_row_without_any_date_is_skipped() {
        let rows = vec![
            row(1, None, Some("22:00"), Some("06:00")),
            row(2, Some("2024-01-05"), Some("22:00"), Some("06:00")),
        ];
        let outcome = build_intervals(rows);

        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("date missing"));
    }

    #[test]
    fn test_header_row_is_treated_as_invalid() {
        let header = RawRow::new(1, None, None, None).with_text("Date | Start | End");
        let rows = vec![header, row(2, Some("2024-01-01"), Some("23:00"), Some("07:00"))];
        let outcome = build_intervals(rows);

        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(
            outcome.skipped[0].to_string(),
            "Invalid data: row 1 (Date | Start | End): start or end time missing. ignoring line."
        );
    }

    #[test]
    fn test_intervals_keep_file_order() {
        let rows = vec![
            row(1, Some("2024-01-03"), Some("22:00"), Some("06:00")),
            row(2, Some("2024-01-01"), Some("22:00"), Some("06:00")),
        ];
        let outcome = build_intervals(rows);
        let dates: Vec<NaiveDate> = outcome.intervals.iter().map(|i| i.date()).collect();
        assert_eq!(dates, vec![date("2024-01-03"), date("2024-01-01")]);
    }

    // ── read_intervals ────────────────────────────────────────────────────────

    #[test]
    fn test_read_intervals_from_memory_source() {
        let mut source = vec![row(1, Some("2024-03-01"), Some("23:00"), Some("07:00"))];
        let outcome = read_intervals(&mut source).unwrap();
        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.intervals[0].duration(), 28_800);
    }

    // ── row_from_cells ────────────────────────────────────────────────────────

    #[test]
    fn test_row_from_cells_serials_and_text() {
        let cells = vec![
            Data::Float(45352.0),
            Data::String("23:00".to_string()),
            Data::Float(7.0 / 24.0),
        ];
        let raw = row_from_cells(5, &cells, 0);

        assert_eq!(raw.line, 5);
        assert_eq!(raw.date, Some(date("2024-03-01")));
        assert_eq!(raw.start, Some(time("23:00")));
        assert_eq!(raw.end, Some(time("07:00")));
    }

    #[test]
    fn test_row_from_cells_empty_and_short_rows() {
        let cells = vec![Data::Empty, Data::String("22:30".to_string())];
        let raw = row_from_cells(2, &cells, 0);

        assert_eq!(raw.date, None);
        assert_eq!(raw.start, Some(time("22:30")));
        assert_eq!(raw.end, None);
    }

    #[test]
    fn test_row_from_cells_header_strings_are_missing() {
        let cells = vec![
            Data::String("Date".to_string()),
            Data::String("Start".to_string()),
            Data::String("End".to_string()),
        ];
        let raw = row_from_cells(1, &cells, 0);

        assert_eq!(raw.date, None);
        assert_eq!(raw.start, None);
        assert_eq!(raw.end, None);
        assert_eq!(raw.text, "Date | Start | End");
    }

    #[test]
    fn test_row_from_cells_honours_column_offset() {
        // Used range starts at column B: the date column lies outside it.
        let cells = vec![Data::String("22:00".to_string()), Data::String("06:00".to_string())];
        let raw = row_from_cells(1, &cells, 1);

        assert_eq!(raw.date, None);
        assert_eq!(raw.start, Some(time("22:00")));
        assert_eq!(raw.end, Some(time("06:00")));
    }

    // ── XlsxSource ────────────────────────────────────────────────────────────

    #[test]
    fn test_row_from_cells_out_of_range_serials_are_missing() {
        let cells = vec![Data::Float(1.0e8), Data::Float(1.0e300), Data::Float(0.25)];
        let raw = row_from_cells(4, &cells, 0);
        assert_eq!(raw.date, None);
        assert_eq!(raw.start, None);
        assert_eq!(raw.end, Some(time("06:00")));

        let outcome = build_intervals(vec![raw]);
        assert!(outcome.intervals.is_empty());
        assert_eq!(outcome.skipped[0].line, 4);
    }

    // ── XlsxSource ────────────────────────────────────────────────────────────

    fn write_sleep_log(path: &Path) {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let date_fmt = Format::new().set_num_format("yyyy-mm-dd");
        let time_fmt = Format::new().set_num_format("hh:mm");
        let d = |y, m, day| ExcelDateTime::from_ymd(y, m, day).unwrap();
        let t = |h, m| ExcelDateTime::from_hms(h, m, 0).unwrap();

        let mut workbook = Workbook::new();
        {
            // Row 0 stays empty so the used range starts one row down.
            let sheet = workbook.add_worksheet();
            sheet.write_string(1, 0, "Date").unwrap();
            sheet.write_string(1, 1, "Start").unwrap();
            sheet.write_string(1, 2, "End").unwrap();

            sheet.write_datetime_with_format(2, 0, &d(2024, 3, 1), &date_fmt).unwrap();
            sheet.write_datetime_with_format(2, 1, &t(23, 0), &time_fmt).unwrap();
            sheet.write_datetime_with_format(2, 2, &t(7, 0), &time_fmt).unwrap();

            sheet.write_datetime_with_format(3, 1, &t(13, 0), &time_fmt).unwrap();
            sheet.write_datetime_with_format(3, 2, &t(14, 0), &time_fmt).unwrap();

            sheet.write_datetime_with_format(4, 0, &d(2024, 3, 2), &date_fmt).unwrap();
            sheet.write_datetime_with_format(4, 1, &t(22, 0), &time_fmt).unwrap();

            sheet.write_datetime_with_format(5, 1, &t(22, 30), &time_fmt).unwrap();
            sheet.write_datetime_with_format(5, 2, &t(6, 30), &time_fmt).unwrap();
        }
        {
            let other = workbook.add_worksheet();
            other.write_string(0, 0, "2030-01-01").unwrap();
            other.write_string(0, 1, "01:00").unwrap();
            other.write_string(0, 2, "02:00").unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_load_workbook_reads_first_sheet() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("sleep.xlsx");
        write_sleep_log(&path);

        let outcome = load_workbook(&path).expect("workbook loads");

        assert_eq!(outcome.intervals.len(), 3);
        assert_eq!(outcome.intervals[0].date(), date("2024-03-01"));
        assert_eq!(outcome.intervals[0].duration(), 8 * 3600);
        assert_eq!(outcome.intervals[1].date(), date("2024-03-01"));
        assert_eq!(outcome.intervals[1].duration(), 3600);
        assert_eq!(outcome.intervals[2].date(), date("2024-03-02"));
        assert_eq!(outcome.intervals[2].duration(), 28_800);

        let lines: Vec<usize> = outcome.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![2, 5]);
        assert!(outcome.skipped[0].text.contains("Date"));
    }

    #[test]
    fn test_open_missing_file_is_source_unavailable() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = tmp.path().join("missing.xlsx");
        let err = load_workbook(&path).unwrap_err();
        assert!(matches!(err, SleepError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("missing.xlsx"));
    }

    #[test]
    fn test_open_corrupt_file_is_source_unavailable() {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .expect("tempfile");
        file.write_all(b"this is not a zip archive").expect("write");

        let err = XlsxSource::open(file.path()).err().expect("open must fail");
        assert!(matches!(err, SleepError::SourceUnavailable { .. }));
    }
}
