//! Suite settings.
//!
//! Layered with the `config` crate, lowest precedence first:
//!
//! 1. built-in defaults (the `URL` environment variable overrides the
//!    default collection URL),
//! 2. the TOML file named by `TODOS_CONFIG`, or `todos-contract.toml` in the
//!    working directory when present,
//! 3. `TODOS_*` environment variables (`TODOS_URL`, `TODOS_TIMEOUT_MS`, ...).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todos_application::{DEFAULT_BASE_URL, DEFAULT_ORIGIN};
use todos_domain::{DEFAULT_TIMEOUT_MS, ExecutionMode};
use url::Url;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "todos-contract.toml";

/// Prefix of the environment variables that override file settings.
const ENV_PREFIX: &str = "TODOS";

/// Environment variable naming an explicit config file.
const CONFIG_PATH_VAR: &str = "TODOS_CONFIG";

/// Environment variable the suite has always read the collection URL from.
const LEGACY_URL_VAR: &str = "URL";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The collection URL is unusable.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl {
        /// Configured value.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The request timeout is zero.
    #[error("timeout_ms must be greater than zero")]
    InvalidTimeout,

    /// The preflight origin is empty.
    #[error("origin must not be empty")]
    EmptyOrigin,
}

/// Settings for one suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Collection URL of the server under test.
    pub url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// `Origin` sent with the CORS preflight.
    pub origin: String,
    /// How scenarios are scheduled.
    pub execution: ExecutionMode,
    /// Whether a failing case skips the rest of its scenario.
    pub stop_on_failure: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            origin: DEFAULT_ORIGIN.to_string(),
            execution: ExecutionMode::default(),
            stop_on_failure: true,
        }
    }
}

impl SuiteConfig {
    /// Load from the process environment and the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with(&env, Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load from an explicit environment map, falling back to
    /// `default_file` when `TODOS_CONFIG` is not set.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed, an explicitly named file
    /// is missing, or a value is invalid.
    pub fn load_with(env: &HashMap<String, String>, default_file: &Path) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let url = env
            .get(LEGACY_URL_VAR)
            .filter(|u| !u.trim().is_empty())
            .map_or(defaults.url, Clone::clone);

        let file = match env.get(CONFIG_PATH_VAR) {
            Some(path) => File::from(PathBuf::from(path))
                .format(FileFormat::Toml)
                .required(true),
            None => File::from(default_file.to_path_buf())
                .format(FileFormat::Toml)
                .required(false),
        };

        let overrides: config::Map<String, String> = env
            .iter()
            .filter(|(key, _)| key.starts_with("TODOS_") && key.as_str() != CONFIG_PATH_VAR)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let config: Self = Config::builder()
            .set_default("url", url)?
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("origin", defaults.origin)?
            .set_default("execution", "sequential")?
            .set_default("stop_on_failure", defaults.stop_on_failure)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(Some(overrides)),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.url).map_err(|e| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.origin.trim().is_empty() {
            return Err(ConfigError::EmptyOrigin);
        }
        Ok(())
    }
}
