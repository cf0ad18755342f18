//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Headers, HttpMethod};
use crate::error::{DomainError, DomainResult};

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Complete specification for one HTTP request issued by the suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// Outgoing headers
    #[serde(default)]
    pub headers: Headers,
    /// JSON document sent as the body, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl RequestSpec {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Adds or replaces a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Attaches a JSON body (builder pattern).
    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Overrides the timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Parses the target URL, accepting only http and https.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the URL is malformed or uses
    /// another scheme.
    pub fn parse_url(&self) -> DomainResult<Url> {
        let url = Url::parse(&self.url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{other}': {}",
                self.url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let req = RequestSpec::new(HttpMethod::Post, "http://localhost:8000/todos")
            .with_header("Accept", "application/json")
            .with_json(json!({"title": "Walk the dog"}))
            .with_timeout_ms(250);

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.headers.get("accept"), Some("application/json"));
        assert_eq!(req.body, Some(json!({"title": "Walk the dog"})));
        assert_eq!(req.timeout_ms, 250);
    }

    #[test]
    fn test_default_timeout() {
        let req = RequestSpec::get("http://localhost:8000/todos/1");
        assert_eq!(req.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(req.body.is_none());
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(RequestSpec::get("http://localhost:8000/todos").parse_url().is_ok());
        assert!(matches!(
            RequestSpec::get("ftp://localhost/todos").parse_url(),
            Err(DomainError::InvalidUrl(_))
        ));
        assert!(matches!(
            RequestSpec::get("not a url").parse_url(),
            Err(DomainError::InvalidUrl(_))
        ));
    }
}
