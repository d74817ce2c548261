use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by sleepgraph.
#[derive(Error, Debug)]
pub enum SleepError {
    /// A row lacked the date, start time or end time needed to build an interval.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// The input spreadsheet is missing, unreadable or corrupt.
    #[error("Cannot read {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// There were no valid intervals to aggregate.
    #[error("No sleep data available")]
    NoData,

    /// A required command-line argument was not supplied.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The report could not be serialised as JSON.
    #[error("Failed to serialise JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the sleepgraph crates.
pub type Result<T> = std::result::Result<T, SleepError>;
