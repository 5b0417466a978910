//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// A structured request payload.
///
/// Payloads are kept structured rather than pre-serialized; encoding to
/// bytes happens when the request is written to the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// A JSON document.
    Json {
        /// The JSON value to send.
        value: serde_json::Value,
    },
    /// Plain text.
    Text {
        /// The text to send.
        content: String,
    },
    /// URL-encoded form fields, sent in declaration order.
    Form {
        /// The form fields as `(key, value)` pairs.
        fields: Vec<(String, String)>,
    },
}

impl RequestBody {
    /// Creates a JSON body.
    #[must_use]
    pub const fn json(value: serde_json::Value) -> Self {
        Self::Json { value }
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Creates a form body.
    #[must_use]
    pub fn form(fields: Vec<(String, String)>) -> Self {
        Self::Form { fields }
    }

    /// Returns true when there is no payload.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the default content type this payload is encoded with.
    ///
    /// An explicit `Content-Type` header on the request takes precedence.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json { .. } => Some("application/json"),
            Self::Text { .. } => Some("text/plain; charset=utf-8"),
            Self::Form { .. } => Some("application/x-www-form-urlencoded"),
        }
    }
}
