//! Data layer for sleepgraph.
//!
//! Reads sleep-log spreadsheets, aggregates intervals into per-date totals
//! and builds the time-of-day histogram.

pub mod aggregator;
pub mod histogram;
pub mod reader;

pub use sleep_core as core;
