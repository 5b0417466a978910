//! Request header types
//!
//! Header names are matched case-insensitively, following RFC 9110
//! field-name semantics. Insertion order is preserved.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A single HTTP header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Validates the header name and value against field syntax rules.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidHeaderName`] if the name is empty or
    /// contains characters outside the RFC 9110 token set, and
    /// [`DomainError::InvalidHeaderValue`] if the value contains control
    /// characters other than horizontal tab.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.is_empty() || !self.name.chars().all(is_token_char) {
            return Err(DomainError::InvalidHeaderName(self.name.clone()));
        }
        if self.value.chars().any(|c| c.is_control() && c != '\t') {
            return Err(DomainError::InvalidHeaderValue {
                name: self.name.clone(),
                reason: "control characters are not allowed".to_string(),
            });
        }
        Ok(())
    }
}

/// Field-name token characters per RFC 9110 section 5.6.2.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// An ordered collection of HTTP headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Headers(Vec<Header>);

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a header.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(Header::new(name, value));
    }

    /// Returns the value of the first header with the given name,
    /// compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns true if a header with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over the headers in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.0.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validates every header in the collection.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> DomainResult<()> {
        for header in &self.0 {
            header.validate()?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| Header::new(name, value))
                .collect(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "application/json");
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(headers.get("accept"), None);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut headers = Headers::new();
        headers.add("b", "2");
        headers.add("a", "1");
        let names: Vec<_> = headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_names_first_wins_on_get() {
        let mut headers = Headers::new();
        headers.add("Accept", "text/html");
        headers.add("accept", "application/json");
        assert_eq!(headers.get("Accept"), Some("text/html"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_name() {
        let header = Header::new("bad name", "value");
        assert!(header.validate().is_err());

        let header = Header::new("", "value");
        assert!(matches!(
            header.validate(),
            Err(DomainError::InvalidHeaderName(_))
        ));
    }

    #[test]
    fn test_validate_rejects_control_chars_in_value() {
        let header = Header::new("X-Test", "line\r\nbreak");
        assert!(matches!(
            header.validate(),
            Err(DomainError::InvalidHeaderValue { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_common_headers() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "application/json;charset=utf-8");
        headers.add("user-agent", "Mozilla/5.0 (X11; Linux x86_64)");
        headers.add("X-Request-Id", "abc-123");
        assert!(headers.validate().is_ok());
    }

    #[test]
    fn test_from_iterator() {
        let headers: Headers = vec![
            ("accept".to_string(), "image/jpeg".to_string()),
            ("x-a".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Accept"), Some("image/jpeg"));
    }
}
