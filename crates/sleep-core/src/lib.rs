//! Core domain types for sleepgraph.
//!
//! Sleep intervals, per-date totals, the error taxonomy, CLI settings, and
//! the formatting and time-conversion helpers shared by the other crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod report;
pub mod settings;
pub mod time_utils;
