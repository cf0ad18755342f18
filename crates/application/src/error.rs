//! Application error types

use std::fmt;

use thiserror::Error;
use todos_domain::{
    AssertionResult, DomainError, FailureDetail, FailureKind, HttpMethod, NetworkFailure,
};

use crate::ports::HttpClientError;

/// A failed expectation, with both sides rendered for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    /// What was checked.
    pub description: String,
    /// Property path that was inspected.
    pub path: String,
    /// Expected value.
    pub expected: Option<String>,
    /// Actual value.
    pub actual: Option<String>,
    /// Evaluator message.
    pub message: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.path)
    }
}

impl From<AssertionResult> for AssertionFailure {
    fn from(result: AssertionResult) -> Self {
        Self {
            description: result.assertion.description(),
            path: result.assertion.path().to_string(),
            expected: result.expected(),
            message: result
                .error
                .unwrap_or_else(|| "assertion failed".to_string()),
            actual: result.actual,
        }
    }
}

/// Errors a request, assertion or scenario step can fail with.
#[derive(Debug, Clone, Error)]
pub enum ContractError {
    /// The server could not be reached. Fatal to the whole run.
    #[error("network error: {0}")]
    Network(HttpClientError),

    /// The response or request had an unexpected shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered with a non-2xx status.
    #[error("{method} {url} was rejected: {status} {status_text}")]
    Rejected {
        /// Request method.
        method: HttpMethod,
        /// Request URL.
        url: String,
        /// Response status.
        status: u16,
        /// Response reason phrase.
        status_text: String,
    },

    /// An expectation did not hold.
    #[error("assertion failed: {0}")]
    Assertion(Box<AssertionFailure>),

    /// A domain validation error occurred.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ContractError {
    /// Returns true if the server could not be reached.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns the rejected status, if this is a rejection.
    #[must_use]
    pub const fn rejected_status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.rejected_status(), Some(404))
    }

    /// Builds the network failure record, for network errors only.
    #[must_use]
    pub fn network_failure(&self) -> Option<NetworkFailure> {
        match self {
            Self::Network(err) => err.network_kind().map(|kind| NetworkFailure {
                kind,
                message: err.to_string(),
            }),
            _ => None,
        }
    }

    /// Converts this error into the failure recorded for a case.
    #[must_use]
    pub fn to_failure_detail(&self) -> FailureDetail {
        match self {
            Self::Assertion(failure) => FailureDetail {
                kind: FailureKind::Assertion,
                description: failure.description.clone(),
                path: Some(failure.path.clone()),
                expected: failure.expected.clone(),
                actual: failure.actual.clone(),
            },
            Self::Rejected { status, .. } => FailureDetail {
                kind: FailureKind::Rejected,
                description: self.to_string(),
                path: Some("status".to_string()),
                expected: Some("2xx".to_string()),
                actual: Some(status.to_string()),
            },
            Self::Network(_) => FailureDetail::new(FailureKind::Network, self.to_string()),
            Self::Protocol(_) | Self::Domain(_) => {
                FailureDetail::new(FailureKind::Protocol, self.to_string())
            }
        }
    }
}

impl From<HttpClientError> for ContractError {
    fn from(err: HttpClientError) -> Self {
        if err.is_network() {
            return Self::Network(err);
        }
        match err {
            HttpClientError::InvalidUrl(url) => Self::Domain(DomainError::InvalidUrl(url)),
            other => Self::Protocol(other.to_string()),
        }
    }
}

impl From<AssertionFailure> for ContractError {
    fn from(failure: AssertionFailure) -> Self {
        Self::Assertion(Box::new(failure))
    }
}

/// Result type alias for suite operations.
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use todos_domain::{Assertion, PropertyPath, TransportErrorKind};

    #[test]
    fn test_client_error_classification() {
        let err: ContractError = HttpClientError::Timeout { timeout_ms: 5000 }.into();
        assert!(err.is_network());
        assert_eq!(
            err.network_failure().map(|f| f.kind),
            Some(TransportErrorKind::Timeout)
        );

        let err: ContractError = HttpClientError::MalformedResponse("bad chunk".to_string()).into();
        assert!(matches!(err, ContractError::Protocol(_)));

        let err: ContractError = HttpClientError::InvalidUrl("nope".to_string()).into();
        assert!(matches!(err, ContractError::Domain(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_not_found() {
        let err = ContractError::Rejected {
            method: HttpMethod::Get,
            url: "http://localhost:8000/todos/1".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "GET http://localhost:8000/todos/1 was rejected: 404 Not Found"
        );
        assert_eq!(err.to_failure_detail().kind, FailureKind::Rejected);
    }

    #[test]
    fn test_assertion_failure_detail() {
        let result = AssertionResult::fail_with_value(
            Assertion::Property {
                path: PropertyPath::parse("status").unwrap(),
                expected: Some(json!(201)),
            },
            "200",
            "Property 'status' mismatch: expected 201, got 200",
        );
        let err = ContractError::from(AssertionFailure::from(result));
        let detail = err.to_failure_detail();

        assert_eq!(detail.kind, FailureKind::Assertion);
        assert_eq!(detail.description, "status == 201");
        assert_eq!(detail.path.as_deref(), Some("status"));
        assert_eq!(detail.expected.as_deref(), Some("201"));
        assert_eq!(detail.actual.as_deref(), Some("200"));
    }
}
