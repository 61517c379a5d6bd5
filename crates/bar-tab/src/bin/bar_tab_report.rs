//! Prints the current tab: per-person totals and, optionally, the order log.
//!
//! Settings come from `BAR_TAB_*` environment variables or flags; see
//! `bar_tab::TrackerSettings`. Diagnostics are logged as JSON on stderr so
//! stdout carries only the report.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use bar_tab::TrackerSettings;
use bar_tab::report::{ReportError, load_tracker, render_report};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "report failed");
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ReportError> {
    let settings = TrackerSettings::load_from_iter(env::args_os()).map_err(|err| {
        ReportError::SettingsError {
            message: err.to_string(),
        }
    })?;
    let tracker = load_tracker(&settings, Arc::new(DefaultClock))?;
    write_report(&render_report(&tracker, settings.show_log));
    Ok(())
}

fn write_report(report: &str) {
    if let Err(err) = writeln!(io::stdout().lock(), "{report}") {
        drop(err);
    }
}
