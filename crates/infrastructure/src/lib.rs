//! Todos Infrastructure - Adapters and implementations
//!
//! This crate provides the reqwest-backed `HttpClient`, configuration
//! loading, tracing setup and the console report.

pub mod adapters;
pub mod logging;
pub mod report;
pub mod settings;

pub use adapters::ReqwestHttpClient;
pub use logging::init_tracing;
pub use report::ConsoleReporter;
pub use settings::{ConfigError, DEFAULT_CONFIG_FILE, SuiteConfig};
