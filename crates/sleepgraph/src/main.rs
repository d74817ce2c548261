mod bootstrap;

use std::path::Path;

use anyhow::Result;
use sleep_core::error::SleepError;
use sleep_core::report::SleepReport;
use sleep_core::settings::Settings;
use sleep_data::aggregator::SleepAggregator;
use sleep_data::histogram::{Histogram, HistogramDisplay};
use sleep_data::reader::{self, ReadOutcome};
use sleep_ui::app::HistogramWindow;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("sleepgraph v{} starting", env!("CARGO_PKG_VERSION"));

    match execute(&settings) {
        Err(e) if matches!(e.downcast_ref::<SleepError>(), Some(SleepError::MissingArgument(_))) => {
            println!("input filename missing.");
            std::process::exit(-1);
        }
        other => other,
    }
}

/// Resolve the input workbook, read it and hand the rows to [`run`].
fn execute(settings: &Settings) -> Result<()> {
    let infile = settings.input_path()?;

    if settings.start_day >= settings.start_night {
        tracing::warn!(
            "start of day ({}h) is not before start of night ({}h); day window is empty",
            settings.start_day,
            settings.start_night
        );
    }

    let outcome = reader::load_workbook(&infile)?;
    run(settings, &infile, &outcome)
}

/// Aggregate, report and optionally plot the intervals read from `infile`.
fn run(settings: &Settings, infile: &Path, outcome: &ReadOutcome) -> Result<()> {
    if !settings.json_output() {
        for skipped in &outcome.skipped {
            println!("{}", skipped);
        }
        if settings.list_intervals {
            for interval in &outcome.intervals {
                println!("{}", interval);
            }
        }
    }

    let totals = SleepAggregator::calculate_totals(&outcome.intervals, settings.day_window());
    let average = match SleepAggregator::calculate_average(&totals) {
        Ok(avg) => avg,
        Err(SleepError::NoData) => {
            anyhow::bail!("no valid sleep intervals found in {}", infile.display())
        }
        Err(e) => return Err(e.into()),
    };

    let report = SleepReport::new(&totals, average, outcome.skipped.len());
    if settings.json_output() {
        println!("{}", report.to_json()?);
    } else {
        for line in report.text_lines() {
            println!("{}", line);
        }
    }

    if settings.histogram {
        let histogram = Histogram::build(&outcome.intervals, settings.raster, settings.resolution);
        let title = format!(
            "Sleep histogram: {} ({} intervals)",
            infile.display(),
            outcome.intervals.len()
        );
        let mut window = HistogramWindow::new(&settings.theme, title);
        window.show(&histogram)?;
    }

    Ok(())
}
