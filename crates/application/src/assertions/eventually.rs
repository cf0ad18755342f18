//! Deferred expectations on a pending response.
//!
//! `eventually(api.get(url), "body.title").to_equal("Walk the dog")` awaits
//! the request, projects the response into `{status, headers, body}` and
//! checks the property at the given path.

use std::future::Future;

use serde_json::Value;
use todos_domain::{Assertion, PropertyPath, ResponseSpec};

use super::evaluator::AssertionEvaluator;
use crate::error::{AssertionFailure, ContractError, ContractResult};

/// Wraps a pending response and the property path to check on it.
#[derive(Debug)]
#[must_use = "an expectation does nothing until one of its checks is awaited"]
pub struct Eventually<F> {
    handle: F,
    path: String,
}

/// Start an expectation on `handle` at the property `path`.
pub fn eventually<F>(handle: F, path: impl Into<String>) -> Eventually<F>
where
    F: Future<Output = ContractResult<ResponseSpec>>,
{
    Eventually {
        handle,
        path: path.into(),
    }
}

impl<F> Eventually<F>
where
    F: Future<Output = ContractResult<ResponseSpec>>,
{
    /// The property is present.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Assertion` when the path does not resolve, or
    /// whatever error the handle failed with.
    pub async fn to_exist(self) -> ContractResult<ResponseSpec> {
        let path = self.parse_path()?;
        self.check(Assertion::Property {
            path,
            expected: None,
        })
        .await
    }

    /// The property equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Assertion` on mismatch, or whatever error the
    /// handle failed with.
    pub async fn to_equal(self, expected: impl Into<Value>) -> ContractResult<ResponseSpec> {
        let path = self.parse_path()?;
        self.check(Assertion::Property {
            path,
            expected: Some(expected.into()),
        })
        .await
    }

    /// The property is an object holding every one of `keys`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Assertion` when a key is missing, or whatever
    /// error the handle failed with.
    pub async fn to_contain_all_keys(self, keys: &[&str]) -> ContractResult<ResponseSpec> {
        let path = self.parse_path()?;
        self.check(Assertion::ContainsAllKeys {
            path,
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
        })
        .await
    }

    /// The property is a string matching the regex `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Assertion` when the value does not match, or
    /// whatever error the handle failed with.
    pub async fn to_match(self, pattern: &str) -> ContractResult<ResponseSpec> {
        let path = self.parse_path()?;
        self.check(Assertion::PropertyMatches {
            path,
            pattern: pattern.to_string(),
        })
        .await
    }

    /// The request is rejected with `status`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::Assertion` when the request succeeds or is
    /// rejected with another status. Network and protocol errors propagate.
    pub async fn to_be_rejected_with(self, status: u16) -> ContractResult<()> {
        let description = format!("rejected with {status}");
        let actual = match self.handle.await {
            Ok(response) => response.status,
            Err(ContractError::Rejected { status: got, .. }) if got == status => return Ok(()),
            Err(ContractError::Rejected { status: got, .. }) => got,
            Err(other) => return Err(other),
        };
        Err(ContractError::Assertion(Box::new(AssertionFailure {
            message: format!("Expected rejection with {status}, got {actual}"),
            description,
            path: self.path,
            expected: Some(status.to_string()),
            actual: Some(actual.to_string()),
        })))
    }

    fn parse_path(&self) -> ContractResult<PropertyPath> {
        Ok(PropertyPath::parse(&self.path)?)
    }

    async fn check(self, assertion: Assertion) -> ContractResult<ResponseSpec> {
        let response = self.handle.await?;
        let result = AssertionEvaluator::new().evaluate(&assertion, &response);
        if result.passed {
            Ok(response)
        } else {
            Err(ContractError::Assertion(Box::new(result.into())))
        }
    }
}
