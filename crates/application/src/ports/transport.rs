//! Transport port

use std::future::Future;

use thiserror::Error;

use reverb_domain::{RequestSpec, ResponseRecord};

/// Errors raised by a transport while moving a request over the wire.
///
/// A completed response is never a transport error, whatever its
/// status code; these cover the cases where no response came back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The URL was rejected by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Name resolution failed for the target host.
    #[error("DNS lookup failed for '{host}': {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Resolver error message.
        message: String,
    },

    /// The target host actively refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// TLS negotiation failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// No complete response arrived within the timeout budget.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The budget that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// The redirect limit was exceeded.
    #[error("stopped after {max} redirects")]
    TooManyRedirects {
        /// Maximum number of redirects followed.
        max: usize,
    },

    /// The request body could not be encoded, or the response body
    /// could not be read.
    #[error("body error: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns true if this error is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Port for moving HTTP requests over the wire.
///
/// This trait abstracts the HTTP client implementation, allowing the
/// application layer to be independent of specific HTTP libraries.
/// Implementations must resolve to a [`ResponseRecord`] for any
/// completed exchange, reserving [`TransportError`] for the cases
/// where no response was received at all.
pub trait Transport: Send + Sync {
    /// Sends the request described by `spec` and observes the response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the request never completed:
    /// connection failures, timeouts, or malformed requests the
    /// transport refuses to send.
    fn send(
        &self,
        spec: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseRecord, TransportError>> + Send;
}
