//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name contains characters not allowed in a field name.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value contains characters not allowed in a field value.
    #[error("invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// Name of the offending header.
        name: String,
        /// What made the value invalid.
        reason: String,
    },

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request timeout budget must be greater than zero.
    #[error("timeout must be greater than zero milliseconds")]
    ZeroTimeout,
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
