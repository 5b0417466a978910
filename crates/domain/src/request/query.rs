//! Query parameter types

use serde::{Deserialize, Serialize};

/// A single query string parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Parameter key.
    pub key: String,
    /// Parameter value, stored unencoded.
    pub value: String,
}

impl QueryParam {
    /// Creates a new query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of query parameters.
///
/// Values are kept unencoded; percent-encoding happens when the request
/// is written to the wire. Duplicate keys are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct QueryParams(Vec<QueryParam>);

impl QueryParams {
    /// Creates an empty parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(QueryParam::new(key, value));
    }

    /// Returns the value of the first parameter with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryParam> {
        self.0.iter()
    }

    /// Returns the parameters as `(key, value)` pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.0
            .iter()
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = &'a QueryParam;
    type IntoIter = std::slice::Iter<'a, QueryParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| QueryParam::new(key, value))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_first_match() {
        let mut params = QueryParams::new();
        params.add("query", "Movie title");
        params.add("page", "2");
        assert_eq!(params.get("query"), Some("Movie title"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_duplicate_keys_allowed() {
        let mut params = QueryParams::new();
        params.add("tag", "a");
        params.add("tag", "b");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("tag"), Some("a"));
    }

    #[test]
    fn test_pairs_preserve_order() {
        let mut params = QueryParams::new();
        params.add("b", "2");
        params.add("a", "1");
        assert_eq!(params.pairs(), vec![("b", "2"), ("a", "1")]);
    }
}
