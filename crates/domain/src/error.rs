//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported for the operation.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body cannot be represented as JSON.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A property path expression is malformed.
    #[error("invalid property path '{path}': {reason}")]
    InvalidPropertyPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A scenario phase transition is not allowed.
    #[error("illegal scenario transition: {from} -> {to}")]
    IllegalTransition {
        /// Phase being left.
        from: String,
        /// Phase requested.
        to: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
