//! Response assertions.
//!
//! The vocabulary of checks the suite can make against a received response,
//! and the record produced when one is evaluated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::property::PropertyPath;

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check a property exists and optionally equals a value.
    Property {
        /// Path into the response property tree.
        path: PropertyPath,
        /// Expected value (as JSON).
        expected: Option<Value>,
    },
    /// Check a string property matches a regex.
    PropertyMatches {
        /// Path into the response property tree.
        path: PropertyPath,
        /// Regex pattern to match.
        pattern: String,
    },
    /// Check the object at a path has every listed key.
    ContainsAllKeys {
        /// Path to an object, e.g. `headers`.
        path: PropertyPath,
        /// Keys that must all be present.
        keys: Vec<String>,
    },
}

impl Assertion {
    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Property {
                path,
                expected: Some(v),
            } => format!("{path} == {v}"),
            Self::Property {
                path,
                expected: None,
            } => format!("{path} exists"),
            Self::PropertyMatches { path, pattern } => format!("{path} matches /{pattern}/"),
            Self::ContainsAllKeys { path, keys } => {
                format!("{path} contains all keys [{}]", keys.join(", "))
            }
        }
    }

    /// The property path this assertion inspects.
    #[must_use]
    pub const fn path(&self) -> &PropertyPath {
        match self {
            Self::Property { path, .. }
            | Self::PropertyMatches { path, .. }
            | Self::ContainsAllKeys { path, .. } => path,
        }
    }

    /// The expected side of the check, rendered for reports.
    #[must_use]
    pub fn expected_display(&self) -> Option<String> {
        match self {
            Self::Property { expected, .. } => expected.as_ref().map(ToString::to_string),
            Self::PropertyMatches { pattern, .. } => Some(format!("/{pattern}/")),
            Self::ContainsAllKeys { keys, .. } => Some(format!("[{}]", keys.join(", "))),
        }
    }
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was evaluated.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }

    /// Expected side of the check, rendered for reports.
    #[must_use]
    pub fn expected(&self) -> Option<String> {
        self.assertion.expected_display()
    }
}
