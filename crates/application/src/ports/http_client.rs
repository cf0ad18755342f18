//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use todos_domain::{RequestSpec, ResponseSpec, TransportErrorKind};

/// Future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + 'a>>;

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation so the suite can run
/// against a real transport or an in-memory fake. Any received response is
/// returned as `Ok`, whatever its status; only transport failures are errors.
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received, or if the response
    /// could not be read.
    fn execute(&self, request: &RequestSpec) -> HttpFuture<'_>;
}

/// Errors raised by an [`HttpClient`] implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was exceeded.
        timeout_ms: u64,
    },

    /// A response arrived but could not be read.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns the transport category for failures where the server was
    /// never reached, `None` otherwise.
    #[must_use]
    pub const fn network_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Self::DnsError { .. } => Some(TransportErrorKind::DnsError),
            Self::ConnectionRefused { .. } => Some(TransportErrorKind::ConnectionRefused),
            Self::ConnectionFailed(_) => Some(TransportErrorKind::ConnectionFailed),
            Self::Timeout { .. } => Some(TransportErrorKind::Timeout),
            Self::Other(_) => Some(TransportErrorKind::Unknown),
            Self::InvalidUrl(_) | Self::InvalidBody(_) | Self::MalformedResponse(_) => None,
        }
    }

    /// Returns true if the server could not be reached.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        self.network_kind().is_some()
    }
}
