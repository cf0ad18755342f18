//! Todos HTTP client wrapper.
//!
//! Thin layer over the [`HttpClient`] port that speaks the Todos wire
//! contract: JSON content negotiation on every request that carries a body,
//! one explicit timeout per request, and non-2xx answers surfaced as
//! [`ContractError::Rejected`]. There are no retries.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use url::Url;

use todos_domain::{DEFAULT_TIMEOUT_MS, DomainError, HttpMethod, RequestSpec, ResponseSpec};

use crate::error::{ContractError, ContractResult};
use crate::ports::HttpClient;

/// Default collection URL of the server under test.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/todos";

/// Default `Origin` sent with the CORS preflight.
pub const DEFAULT_ORIGIN: &str = "http://someplace.com";

const JSON: &str = "application/json";

/// Client for the Todos API under test.
///
/// Cloning is cheap; clones share the underlying transport.
#[derive(Clone)]
pub struct TodoApi {
    client: Arc<dyn HttpClient>,
    base_url: Url,
    origin: String,
    timeout_ms: u64,
}

impl TodoApi {
    /// Creates a client for the collection at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(client: Arc<dyn HttpClient>, base_url: &str) -> ContractResult<Self> {
        let base_url = RequestSpec::get(base_url).parse_url()?;
        Ok(Self {
            client,
            base_url,
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    /// Sets the per-request timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the `Origin` used by [`Self::preflight`] callers (builder pattern).
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// The collection URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// The configured preflight origin.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The per-request timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Resolves a `Location` value against the collection URL.
    ///
    /// Absolute locations are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the location cannot be joined.
    pub fn resolve(&self, location: &str) -> ContractResult<String> {
        self.base_url
            .join(location)
            .map(String::from)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {location}")).into())
    }

    /// POST `data` as JSON to `url`.
    ///
    /// # Errors
    ///
    /// Fails with a network, protocol or rejection error.
    pub async fn post<T>(&self, url: &str, data: &T) -> ContractResult<ResponseSpec>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = to_json(data)?;
        self.send(json_request(HttpMethod::Post, url).with_json(body))
            .await
    }

    /// GET `url`, accepting JSON.
    ///
    /// # Errors
    ///
    /// Fails with a network, protocol or rejection error.
    pub async fn get(&self, url: &str) -> ContractResult<ResponseSpec> {
        self.send(RequestSpec::get(url).with_header("Accept", JSON))
            .await
    }

    /// DELETE `url`.
    ///
    /// # Errors
    ///
    /// Fails with a network, protocol or rejection error.
    pub async fn del(&self, url: &str) -> ContractResult<ResponseSpec> {
        self.send(RequestSpec::new(HttpMethod::Delete, url)).await
    }

    /// Sends `data` as JSON to `url` with an update method (PUT or PATCH).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnsupportedMethod` for any other method, and
    /// otherwise fails with a network, protocol or rejection error.
    pub async fn update<T>(
        &self,
        url: &str,
        method: HttpMethod,
        data: &T,
    ) -> ContractResult<ResponseSpec>
    where
        T: Serialize + Sync + ?Sized,
    {
        if !method.is_update() {
            return Err(DomainError::UnsupportedMethod(format!(
                "{method} cannot be used to update a resource"
            ))
            .into());
        }
        let body = to_json(data)?;
        self.send(json_request(method, url).with_json(body)).await
    }

    /// Issues a CORS preflight (`OPTIONS`) for a JSON `POST` from `origin`.
    ///
    /// # Errors
    ///
    /// Fails with a network, protocol or rejection error.
    pub async fn preflight(&self, url: &str, origin: &str) -> ContractResult<ResponseSpec> {
        let request = RequestSpec::new(HttpMethod::Options, url)
            .with_header("Origin", origin)
            .with_header("Access-Control-Request-Method", HttpMethod::Post.as_str())
            .with_header("Access-Control-Request-Headers", "content-type");
        self.send(request).await
    }

    async fn send(&self, request: RequestSpec) -> ContractResult<ResponseSpec> {
        let request = request.with_timeout_ms(self.timeout_ms);
        request.parse_url()?;

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.client.execute(&request).await?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            "received response"
        );

        if response.is_success() {
            Ok(response)
        } else {
            Err(ContractError::Rejected {
                method: request.method,
                url: request.url,
                status: response.status,
                status_text: response.status_text,
            })
        }
    }
}

impl std::fmt::Debug for TodoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoApi")
            .field("base_url", &self.base_url.as_str())
            .field("origin", &self.origin)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

fn json_request(method: HttpMethod, url: &str) -> RequestSpec {
    RequestSpec::new(method, url)
        .with_header("Content-Type", JSON)
        .with_header("Accept", JSON)
}

fn to_json<T: Serialize + ?Sized>(data: &T) -> ContractResult<serde_json::Value> {
    serde_json::to_value(data).map_err(|e| DomainError::InvalidBody(e.to_string()).into())
}
