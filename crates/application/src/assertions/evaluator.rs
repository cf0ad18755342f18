//! Assertion evaluator.
//!
//! Evaluates [`Assertion`] values against a received response and produces
//! [`AssertionResult`] records.

use regex::Regex;
use serde_json::Value;
use todos_domain::{Assertion, AssertionResult, PropertyPath, ResponseSpec};

/// Evaluates assertions against responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertionEvaluator;

impl AssertionEvaluator {
    /// Create a new evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate a single assertion against a response.
    #[must_use]
    pub fn evaluate(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        let tree = response.property_tree();
        match assertion {
            Assertion::Property { path, expected } => {
                check_property(assertion, &tree, path, expected.as_ref())
            }
            Assertion::PropertyMatches { path, pattern } => {
                check_property_matches(assertion, &tree, path, pattern)
            }
            Assertion::ContainsAllKeys { path, keys } => {
                check_contains_all_keys(assertion, &tree, path, keys)
            }
        }
    }
}

fn check_property(
    assertion: &Assertion,
    tree: &Value,
    path: &PropertyPath,
    expected: Option<&Value>,
) -> AssertionResult {
    match (path.resolve(tree), expected) {
        (Some(actual), Some(expected)) if actual != expected => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Property '{path}' mismatch: expected {expected}, got {actual}"),
        ),
        (Some(actual), _) => AssertionResult::pass_with_value(assertion.clone(), actual.to_string()),
        (None, _) => AssertionResult::fail(assertion.clone(), format!("Property '{path}' not found")),
    }
}

fn check_property_matches(
    assertion: &Assertion,
    tree: &Value,
    path: &PropertyPath,
    pattern: &str,
) -> AssertionResult {
    let Some(actual) = path.resolve(tree) else {
        return AssertionResult::fail(assertion.clone(), format!("Property '{path}' not found"));
    };
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            return AssertionResult::fail(
                assertion.clone(),
                format!("Invalid regex pattern '{pattern}': {e}"),
            );
        }
    };

    match actual {
        Value::String(text) if regex.is_match(text) => {
            AssertionResult::pass_with_value(assertion.clone(), text.as_str())
        }
        _ => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Property '{path}' value {actual} does not match pattern '{pattern}'"),
        ),
    }
}

fn check_contains_all_keys(
    assertion: &Assertion,
    tree: &Value,
    path: &PropertyPath,
    keys: &[String],
) -> AssertionResult {
    let Some(actual) = path.resolve(tree) else {
        return AssertionResult::fail(assertion.clone(), format!("Property '{path}' not found"));
    };
    let Some(object) = actual.as_object() else {
        return AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Property '{path}' is not an object"),
        );
    };

    let present: Vec<&str> = object.keys().map(String::as_str).collect();
    let missing: Vec<&str> = keys
        .iter()
        .map(String::as_str)
        .filter(|key| !object.contains_key(*key))
        .collect();

    if missing.is_empty() {
        AssertionResult::pass_with_value(assertion.clone(), format!("[{}]", present.join(", ")))
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            format!("[{}]", present.join(", ")),
            format!("Property '{path}' is missing keys [{}]", missing.join(", ")),
        )
    }
}
