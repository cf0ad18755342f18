//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the suite and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod http_client;

pub use http_client::{HttpClient, HttpClientError, HttpFuture};
