//! Transport failure categories.
//!
//! Used to classify why a request never produced a response, and to give the
//! operator something actionable in the final report.

use serde::{Deserialize, Serialize};

/// Categories of transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// DNS resolution failed.
    DnsError,

    /// Could not establish connection.
    ConnectionFailed,

    /// Connection was refused by the server.
    ConnectionRefused,

    /// Request timed out.
    Timeout,

    /// The response could not be read or decoded.
    MalformedResponse,

    /// Unknown or unexpected error.
    Unknown,
}

impl TransportErrorKind {
    /// Returns operator hints for this failure.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::DnsError => &[
                "Check that the hostname in the suite URL is correct",
                "Try using an IP address instead",
            ],
            Self::ConnectionFailed | Self::ConnectionRefused => &[
                "Check that the Todos server is running",
                "Verify the port in the suite URL",
            ],
            Self::Timeout => &[
                "The server may be slow or overloaded",
                "Raise TODOS_TIMEOUT_MS",
            ],
            Self::MalformedResponse => &["The server sent a response that is not valid HTTP"],
            Self::Unknown => &["Check the error details for more information"],
        }
    }

    /// Returns a human-readable title for this failure.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::DnsError => "DNS Resolution Failed",
            Self::ConnectionFailed => "Connection Failed",
            Self::ConnectionRefused => "Connection Refused",
            Self::Timeout => "Request Timeout",
            Self::MalformedResponse => "Malformed Response",
            Self::Unknown => "Unknown Error",
        }
    }
}
