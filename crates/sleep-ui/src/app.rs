//! Blocking terminal window that shows the sleep histogram.
//!
//! [`HistogramWindow`] takes over the terminal with an alternate screen,
//! draws the chart and waits until the user dismisses it.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use sleep_core::error::Result;
use sleep_data::histogram::{Histogram, HistogramDisplay};

use crate::histogram_view;
use crate::themes::Theme;

/// Whether `key` dismisses the window (`q`, `Q`, `Esc` or `Ctrl+C`).
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

/// Interactive histogram display.
pub struct HistogramWindow {
    /// Active colour theme.
    pub theme: Theme,
    /// Chart title.
    pub title: String,
}

impl HistogramWindow {
    pub fn new(theme_name: &str, title: impl Into<String>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            title: title.into(),
        }
    }

    /// Draw `histogram` until the user presses a quit key.
    pub fn run(&self, histogram: &Histogram) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| {
                let area = frame.area();
                if histogram.total() == 0 {
                    histogram_view::render_no_data(frame, area, &self.theme);
                } else {
                    histogram_view::render_histogram_view(
                        frame,
                        area,
                        &self.title,
                        histogram,
                        &self.theme,
                    );
                }
            }) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if is_quit_key(&key) => break Ok(()),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

impl HistogramDisplay for HistogramWindow {
    fn show(&mut self, histogram: &Histogram) -> Result<()> {
        debug!("Showing histogram with {} bins", histogram.bin_count());
        self.run(histogram)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
