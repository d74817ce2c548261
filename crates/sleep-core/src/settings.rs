use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::{Result, SleepError};
use crate::models::DayWindow;

/// Extension appended to the input file name when it is missing.
pub const INPUT_EXTENSION: &str = ".xlsx";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Draws a histogram over sleep time from a spreadsheet file
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sleepgraph",
    about = "Draws a histogram over sleep time from a spreadsheet file",
    version
)]
pub struct Settings {
    /// Input file to read from
    #[arg(short = 'i', long)]
    pub infile: Option<PathBuf>,

    /// Plot sleep histogram
    #[arg(short = 'H', long)]
    pub histogram: bool,

    /// Raster in minutes
    #[arg(short = 'R', long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=1440))]
    pub raster: u32,

    /// Resolution (histogram bin width) in minutes
    #[arg(short = 'r', long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=1440))]
    pub resolution: u32,

    /// Start of the day (hour 0-23)
    #[arg(short = 'd', long, default_value = "8", value_parser = clap::value_parser!(u8).range(0..=23))]
    pub start_day: u8,

    /// Start of the night (hour 0-23)
    #[arg(short = 'n', long, default_value = "19", value_parser = clap::value_parser!(u8).range(0..=23))]
    pub start_night: u8,

    /// Print every parsed interval before the report
    #[arg(long)]
    pub list_intervals: bool,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Histogram colour theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::parse().resolve()
    }

    /// Same as [`Settings::load`] but over an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::resolve)
    }

    fn resolve(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// The input path with the spreadsheet extension appended if absent.
    ///
    /// Fails with [`SleepError::MissingArgument`] when no input was given.
    pub fn input_path(&self) -> Result<PathBuf> {
        self.infile
            .as_deref()
            .map(resolve_input_path)
            .ok_or_else(|| SleepError::MissingArgument("--infile".to_string()))
    }

    pub fn day_window(&self) -> DayWindow {
        DayWindow::new(self.start_day, self.start_night)
    }

    pub fn json_output(&self) -> bool {
        self.format == "json"
    }
}

/// Append [`INPUT_EXTENSION`] unless `path` already ends with it.
pub fn resolve_input_path(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(INPUT_EXTENSION) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(INPUT_EXTENSION);
    PathBuf::from(name)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
