//! Request specification type

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Headers, HttpMethod, QueryParams, RequestBody};
use crate::error::{DomainError, DomainResult};

/// Default per-request timeout budget in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Complete specification for an HTTP request.
///
/// A spec is a value. It carries everything needed to perform the call,
/// so executing the same spec twice sends the same request twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// HTTP headers.
    #[serde(default)]
    pub headers: Headers,
    /// Query parameters, appended to any query already on the URL.
    #[serde(default)]
    pub query: QueryParams,
    /// Request body.
    #[serde(default)]
    pub body: RequestBody,
    /// Timeout budget in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// When true, a completed response with status outside 200-399
    /// is treated as an execution failure.
    #[serde(default)]
    pub fail_fast: bool,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl RequestSpec {
    /// Starts building a request with the given method and URL.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(method, url)
    }

    /// Starts building a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> RequestSpecBuilder {
        Self::builder(HttpMethod::Get, url)
    }

    /// Starts building a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> RequestSpecBuilder {
        Self::builder(HttpMethod::Post, url)
    }

    /// Starts building a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> RequestSpecBuilder {
        Self::builder(HttpMethod::Delete, url)
    }

    /// Validates the specification.
    ///
    /// Construction through [`RequestSpecBuilder`] validates already;
    /// this is for specs that arrive through deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the URL scheme is not
    /// `http`/`https` or the URL has no host, a header error if any
    /// header fails field syntax validation, and
    /// [`DomainError::ZeroTimeout`] if the timeout budget is zero.
    pub fn validate(&self) -> DomainResult<()> {
        match self.url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DomainError::InvalidUrl(format!(
                    "unsupported scheme '{other}'"
                )));
            }
        }
        if self.url.host_str().is_none() {
            return Err(DomainError::InvalidUrl("missing host".to_string()));
        }
        self.headers.validate()?;
        if self.timeout_ms == 0 {
            return Err(DomainError::ZeroTimeout);
        }
        Ok(())
    }

    /// Returns the target URL with the spec's query parameters appended.
    #[must_use]
    pub fn url_with_query(&self) -> Url {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let mut url = self.url.clone();
        url.query_pairs_mut().extend_pairs(self.query.pairs());
        url
    }

    /// Returns the timeout budget as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Builder for [`RequestSpec`].
#[derive(Debug, Clone)]
pub struct RequestSpecBuilder {
    method: HttpMethod,
    url: String,
    headers: Headers,
    query: QueryParams,
    body: RequestBody,
    timeout_ms: u64,
    fail_fast: bool,
}

impl RequestSpecBuilder {
    /// Creates a builder for the given method and URL.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            query: QueryParams::new(),
            body: RequestBody::None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fail_fast: false,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(key, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json(self, value: serde_json::Value) -> Self {
        self.body(RequestBody::json(value))
    }

    /// Sets a plain text request body.
    #[must_use]
    pub fn text(self, content: impl Into<String>) -> Self {
        self.body(RequestBody::text(content))
    }

    /// Sets the timeout budget in milliseconds.
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Enables or disables fail-fast status handling.
    #[must_use]
    pub const fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Builds and validates the specification.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the URL does not parse as
    /// an absolute URL, plus any error [`RequestSpec::validate`] reports.
    pub fn build(self) -> DomainResult<RequestSpec> {
        let url = Url::parse(&self.url)
            .map_err(|e| DomainError::InvalidUrl(format!("'{}': {e}", self.url)))?;
        let spec = RequestSpec {
            method: self.method,
            url,
            headers: self.headers,
            query: self.query,
            body: self.body,
            timeout_ms: self.timeout_ms,
            fail_fast: self.fail_fast,
        };
        spec.validate()?;
        Ok(spec)
    }
}
