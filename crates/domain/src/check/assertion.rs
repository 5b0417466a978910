//! Response assertions.
//!
//! An [`Assertion`] is a declarative predicate over a completed response
//! record. Assertions are data: they can be serialized, compared, and
//! evaluated any number of times against the same record with the same
//! result.

use serde::{Deserialize, Serialize};

/// A declarative predicate over a response record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// The status code equals an exact value.
    StatusEquals {
        /// Expected status code.
        expected: u16,
    },
    /// The status code falls inside an inclusive range.
    StatusInRange {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// The exchange completed within a time budget.
    DurationWithin {
        /// Maximum allowed time in milliseconds (inclusive).
        max_ms: u64,
    },
    /// A response header exists, optionally with an exact value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value (case-sensitive).
        expected: Option<String>,
    },
    /// A response header value matches a regex pattern.
    HeaderMatches {
        /// Header name (case-insensitive).
        name: String,
        /// Regex pattern to match.
        pattern: String,
    },
    /// A header that went out on the wire carried an exact value.
    RequestHeaderEquals {
        /// Header name (case-insensitive).
        name: String,
        /// Expected value (case-sensitive).
        expected: String,
    },
    /// The `Content-Type` response header contains a substring.
    ContentTypeContains {
        /// Expected content type fragment (e.g. "image/jpeg").
        expected: String,
    },
    /// The body text contains a substring.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        #[serde(default)]
        ignore_case: bool,
    },
    /// The body text matches a regex pattern.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
    /// A JSON body path exists, optionally with an exact value.
    JsonBodyAt {
        /// Dotted path expression (e.g. "$.args.query").
        path: String,
        /// Expected value (as JSON). `None` only requires presence.
        expected: Option<serde_json::Value>,
    },
}

impl Assertion {
    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusEquals { expected } => format!("Status code = {expected}"),
            Self::StatusInRange { min, max } => format!("Status code in {min}-{max}"),
            Self::DurationWithin { max_ms } => format!("Duration <= {max_ms}ms"),
            Self::HeaderExists {
                name,
                expected: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists {
                name,
                expected: None,
            } => format!("Header '{name}' exists"),
            Self::HeaderMatches { name, pattern } => {
                format!("Header '{name}' matches /{pattern}/")
            }
            Self::RequestHeaderEquals { name, expected } => {
                format!("Sent header '{name}' equals '{expected}'")
            }
            Self::ContentTypeContains { expected } => {
                format!("Content-Type contains '{expected}'")
            }
            Self::BodyContains { text, .. } => format!("Body contains '{text}'"),
            Self::BodyMatches { pattern } => format!("Body matches /{pattern}/"),
            Self::JsonBodyAt {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonBodyAt {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
        }
    }
}
