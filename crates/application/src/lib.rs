//! Todos Application - Contract suite logic
//!
//! This crate drives the Todos contract: the [`TodoApi`] request wrapper over
//! the [`HttpClient`] port, `eventually` expectations, the scenario runner and
//! suite driver, and the built-in scenarios.

pub mod assertions;
pub mod client;
pub mod error;
pub mod ports;
pub mod scenario;
pub mod scenarios;
pub mod suite;

#[cfg(test)]
mod test_support;

pub use assertions::{AssertionEvaluator, Eventually, eventually};
pub use client::{DEFAULT_BASE_URL, DEFAULT_ORIGIN, TodoApi};
pub use error::{AssertionFailure, ContractError, ContractResult};
pub use ports::{HttpClient, HttpClientError, HttpFuture};
pub use scenario::{Scenario, ScenarioContext, ScenarioRunner, Step, StepFuture, TestCase};
pub use suite::SuiteDriver;
