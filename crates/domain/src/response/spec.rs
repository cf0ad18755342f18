//! Response specification type
//!
//! The immutable result of one HTTP exchange: status, lower-cased headers,
//! raw body and timing.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Received HTTP response.
///
/// Header names are stored lower-cased; repeated headers are joined with
/// `", "` as HTTP allows for list-valued fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Status text (e.g., "Created", "Not Found")
    pub status_text: String,
    /// Response headers keyed by lower-cased name.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Response body as text.
    pub body: String,
    /// Response time.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// Response size in bytes.
    pub size: usize,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    ///
    /// `headers` yields one pair per header field as received; repeated
    /// names are folded into a single entry.
    #[must_use]
    pub fn new(
        status: u16,
        headers: impl IntoIterator<Item = (String, String)>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let size = body.len();

        let mut normalized: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let body = String::from_utf8(body)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            headers: normalized,
            body,
            duration,
            size,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Parses the body as JSON. An empty body is JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the body is non-empty and not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        if self.body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str(&self.body)
        }
    }

    /// Builds the document property paths are resolved against:
    /// `{ "status": .., "headers": { .. }, "body": .. }`.
    ///
    /// A body that is not valid JSON is exposed as a JSON string.
    #[must_use]
    pub fn property_tree(&self) -> Value {
        let headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let body = self
            .json()
            .unwrap_or_else(|_| Value::String(self.body.clone()));

        let mut tree = Map::new();
        tree.insert("status".to_string(), Value::from(self.status));
        tree.insert("status_text".to_string(), Value::String(self.status_text.clone()));
        tree.insert("headers".to_string(), Value::Object(headers));
        tree.insert("body".to_string(), body);
        Value::Object(tree)
    }
}

/// Reason phrase for the statuses a CRUD API answers with.
const fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

impl Default for ResponseSpec {
    fn default() -> Self {
        Self {
            status: 0,
            status_text: String::new(),
            headers: BTreeMap::new(),
            body: String::new(),
            duration: Duration::ZERO,
            size: 0,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
