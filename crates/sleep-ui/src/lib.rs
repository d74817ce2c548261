//! Terminal UI layer for sleepgraph.
//!
//! Provides the colour themes, the histogram chart view and the blocking
//! window that displays it, built on top of [`ratatui`].

pub mod app;
pub mod histogram_view;
pub mod themes;

pub use sleep_core as core;
