//! Response record types
//!
//! A [`ResponseRecord`] is the immutable observation of one completed
//! HTTP exchange: status, timing, both header maps, and the decoded
//! body. Evaluation reads records; it never re-runs requests.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::StatusCode;

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseBody {
    /// No payload.
    #[default]
    Empty,
    /// Payload parsed as a JSON document.
    Json {
        /// The parsed JSON value.
        value: serde_json::Value,
    },
    /// Payload decoded as text.
    Text {
        /// The decoded text.
        text: String,
    },
    /// Raw payload bytes for binary content.
    Bytes {
        /// The raw bytes, base64-encoded in serialized form.
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
}

impl ResponseBody {
    /// Creates a JSON body.
    #[must_use]
    pub const fn json(value: serde_json::Value) -> Self {
        Self::Json { value }
    }

    /// Creates a text body.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a binary body.
    #[must_use]
    pub const fn bytes(data: Vec<u8>) -> Self {
        Self::Bytes { data }
    }

    /// Returns true when there is no payload.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the parsed JSON value, if this is a JSON body.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the decoded text, if this is a text body.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Returns the raw bytes, if this is a binary body.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes { data } => Some(data),
            _ => None,
        }
    }

    /// Renders the payload as text for substring and pattern checks.
    ///
    /// JSON bodies render in compact form; binary bodies decode lossily.
    #[must_use]
    pub fn to_text_lossy(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Json { value } => value.to_string(),
            Self::Text { text } => text.clone(),
            Self::Bytes { data } => String::from_utf8_lossy(data).into_owned(),
        }
    }
}

/// The observed result of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// HTTP status code.
    pub status: u16,
    /// Time from sending the request to receiving the full response.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// Response headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Headers that actually went out on the wire, including any the
    /// transport added on its own.
    #[serde(default)]
    pub request_headers: HashMap<String, String>,
    /// Decoded response body.
    #[serde(default)]
    pub body: ResponseBody,
}

impl ResponseRecord {
    /// Creates a new record from observed response data.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        duration: Duration,
        headers: HashMap<String, String>,
        request_headers: HashMap<String, String>,
        body: ResponseBody,
    ) -> Self {
        Self {
            status: status.into().as_u16(),
            duration,
            headers,
            request_headers,
            body,
        }
    }

    /// Returns the status as a [`StatusCode`].
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code().is_success()
    }

    /// Returns the elapsed time in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// Gets a response header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }

    /// Gets a sent request header value by name (case-insensitive).
    #[must_use]
    pub fn request_header(&self, name: &str) -> Option<&str> {
        lookup(&self.request_headers, name)
    }

    /// Returns the `Content-Type` response header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

fn lookup<'a>(map: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
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

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record_with_headers() -> ResponseRecord {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/json".to_string(),
        );
        let mut request_headers = HashMap::new();
        request_headers.insert("accept".to_string(), "image/jpeg".to_string());

        ResponseRecord::new(
            200,
            Duration::from_millis(120),
            headers,
            request_headers,
            ResponseBody::json(json!({"ok": true})),
        )
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let record = record_with_headers();
        assert_eq!(record.header("content-type"), Some("application/json"));
        assert_eq!(record.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(record.header("x-missing"), None);
    }

    #[test]
    fn test_request_header_lookup_case_insensitive() {
        let record = record_with_headers();
        assert_eq!(record.request_header("Accept"), Some("image/jpeg"));
        assert_eq!(record.request_header("user-agent"), None);
    }

    #[test]
    fn test_duration_ms() {
        let record = record_with_headers();
        assert_eq!(record.duration_ms(), 120);
    }

    #[test]
    fn test_body_accessors() {
        assert_eq!(
            ResponseBody::json(json!({"a": 1})).as_json(),
            Some(&json!({"a": 1}))
        );
        assert_eq!(ResponseBody::text("hello").as_text(), Some("hello"));
        assert_eq!(
            ResponseBody::bytes(vec![0xFF, 0xD8]).as_bytes(),
            Some(&[0xFF, 0xD8][..])
        );
        assert!(ResponseBody::Empty.is_empty());
    }

    #[test]
    fn test_to_text_lossy_renders_json_compact() {
        let body = ResponseBody::json(json!({"args": {"query": "Movie title"}}));
        assert_eq!(body.to_text_lossy(), r#"{"args":{"query":"Movie title"}}"#);
    }

    #[test]
    fn test_serde_round_trip_with_binary_body() {
        let record = ResponseRecord::new(
            200,
            Duration::from_millis(42),
            HashMap::new(),
            HashMap::new(),
            ResponseBody::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]),
        );

        let encoded = serde_json::to_string(&record).unwrap();
        assert!(encoded.contains("\"duration\":42"));
        // Bytes serialize as base64, not as a numeric array.
        assert!(encoded.contains("/9j/4A=="));

        let decoded: ResponseRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, record);
    }
}
