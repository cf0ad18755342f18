//! Todos Contract - Main Entry Point
//!
//! Loads configuration, runs the suite against the configured server and
//! exits 0 only if every case passed.

use std::io::Write;
use std::process::ExitCode;

use todos_contract::{ConsoleReporter, SuiteConfig, init_tracing, run_suite};
use tracing::error;

/// Exit status when the suite could not run at all.
const EXIT_SETUP_ERROR: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("failed to initialise logging: {err}");
    }

    let config = match SuiteConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::from(EXIT_SETUP_ERROR);
        }
    };

    let report = match run_suite(&config).await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "suite could not start");
            return ExitCode::from(EXIT_SETUP_ERROR);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = ConsoleReporter::new()
        .write(&report, &mut stdout)
        .and_then(|()| stdout.flush())
    {
        error!(error = %err, "failed to write report");
    }

    ExitCode::from(report.exit_code())
}
