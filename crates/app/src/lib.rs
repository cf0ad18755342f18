//! Todos Contract - Suite entry point
//!
//! Wires the reqwest adapter, the built-in scenarios and the suite driver
//! together from a [`SuiteConfig`].

use std::sync::Arc;

use thiserror::Error;
use todos_application::{
    ContractError, HttpClientError, ScenarioRunner, SuiteDriver, TodoApi, scenarios,
};
use todos_domain::SuiteReport;
use todos_infrastructure::ReqwestHttpClient;
use tracing::info;

pub use todos_infrastructure::{ConfigError, ConsoleReporter, SuiteConfig, init_tracing};

/// Errors that keep the suite from starting.
#[derive(Debug, Error)]
pub enum RunError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] HttpClientError),

    /// The configured URL was rejected.
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Build the client described by `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the URL is invalid.
pub fn build_api(config: &SuiteConfig) -> Result<TodoApi, RunError> {
    let client = ReqwestHttpClient::new()?;
    let api = TodoApi::new(Arc::new(client), &config.url)?
        .with_timeout_ms(config.timeout_ms)
        .with_origin(config.origin.clone());
    Ok(api)
}

/// Run every built-in scenario against the server in `config`.
///
/// Failing cases and an unreachable server are reported in the returned
/// [`SuiteReport`], not as errors.
///
/// # Errors
///
/// Returns an error only if the suite cannot start.
pub async fn run_suite(config: &SuiteConfig) -> Result<SuiteReport, RunError> {
    let api = build_api(config)?;
    info!(url = %config.url, timeout_ms = config.timeout_ms, "suite configured");

    let driver = SuiteDriver::new(api)
        .with_runner(ScenarioRunner::new().with_stop_on_failure(config.stop_on_failure))
        .with_execution(config.execution);
    Ok(driver.run(&scenarios::all()).await)
}
