//! Time-of-day histogram view.
//!
//! Renders a [`ratatui::widgets::Chart`] with one vertical bar per bin,
//! `HH:MM` hour ticks along the x axis, and bins at the maximum count
//! highlighted.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use sleep_core::formatting::format_tick;
use sleep_data::histogram::Histogram;

use crate::themes::Theme;

/// Candidate spacings between x-axis ticks, in hours.
const TICK_STEPS: [u32; 6] = [1, 2, 3, 4, 6, 12];

/// Columns reserved per tick label (`HH:MM` plus a gap).
const TICK_LABEL_WIDTH: u32 = 6;

/// Smallest tick spacing whose labels fit into `width` columns.
pub fn tick_step_hours(width: u16) -> u32 {
    TICK_STEPS
        .iter()
        .copied()
        .find(|step| (24 / step + 1) * TICK_LABEL_WIDTH <= u32::from(width))
        .unwrap_or(24)
}

/// `HH:MM` labels from 00:00 to 24:00 every `step` hours.
pub fn hour_tick_labels(step: u32) -> Vec<String> {
    (0..=24)
        .step_by(step.max(1) as usize)
        .map(|h| format_tick(h * 60))
        .collect()
}

/// Split the bins into `(regular, peak)` chart points, x in hours at the bin
/// centre and y the occurrence count.
fn bar_points(histogram: &Histogram) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let max = histogram.max_count();
    let half_width = histogram.bin_width_minutes() / 2.0;

    histogram
        .counts()
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let x = (histogram.bin_start_minutes(i) + half_width) / 60.0;
            (x, count as f64, max > 0 && count == max)
        })
        .fold((Vec::new(), Vec::new()), |(mut regular, mut peak), (x, y, is_peak)| {
            if is_peak {
                peak.push((x, y));
            } else {
                regular.push((x, y));
            }
            (regular, peak)
        })
}

/// Render the histogram chart into `area` with a key-hint footer.
pub fn render_histogram_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    histogram: &Histogram,
    theme: &Theme,
) {
    let [chart_area, footer_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    let (regular, peak) = bar_points(histogram);
    let datasets = vec![
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Bar)
            .style(theme.bar)
            .data(&regular),
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Bar)
            .style(theme.bar_peak)
            .data(&peak),
    ];

    let y_max = (histogram.max_count().max(1) as f64 * 1.1).ceil();
    let x_labels = hour_tick_labels(tick_step_hours(chart_area.width.saturating_sub(10)));
    let y_labels = vec![
        "0".to_string(),
        format!("{}", (y_max / 2.0).round()),
        format!("{}", y_max),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Span::styled(format!(" {} ", title), theme.title)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled("time of day", theme.dim))
                .style(theme.axis)
                .bounds([0.0, 24.0])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("count", theme.dim))
                .style(theme.axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        )
        .legend_position(None)
        .style(theme.text);

    frame.render_widget(chart, chart_area);

    let footer = Line::from(vec![
        Span::styled(
            format!(
                "{} bins of {} min, {} samples",
                histogram.bin_count(),
                histogram.bin_width_minutes(),
                histogram.total()
            ),
            theme.dim,
        ),
        Span::styled("  |  Press 'q' or Ctrl+C to exit", theme.dim),
    ]);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

/// Render a placeholder when there is nothing to plot.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sleep intervals to plot", theme.title)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(" sleepgraph "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
