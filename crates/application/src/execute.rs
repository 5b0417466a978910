//! Execute request use case
//!
//! Validates a request specification, hands it to the transport, and
//! applies fail-fast status handling to the observed response.

use std::sync::Arc;

use thiserror::Error;

use reverb_domain::{DomainError, RequestSpec, ResponseRecord};

use crate::ports::{Transport, TransportError};

/// Result type for request execution.
pub type ExecuteResult = Result<ResponseRecord, ExecuteError>;

/// Error type for the execute request use case.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecuteError {
    /// The specification failed validation before anything was sent.
    #[error("invalid request: {0}")]
    Invalid(#[from] DomainError),

    /// The transport could not complete the exchange.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Fail-fast was requested and the response status fell outside
    /// the 200-399 range. The completed record is preserved.
    #[error("request failed with status {}", .record.status_code())]
    FailedStatus {
        /// The response that was observed before failing.
        record: Box<ResponseRecord>,
    },
}

impl ExecuteError {
    /// Returns the response record a fail-fast rejection observed.
    #[must_use]
    pub fn failed_record(&self) -> Option<&ResponseRecord> {
        match self {
            Self::FailedStatus { record } => Some(record),
            _ => None,
        }
    }

    /// Returns true if the underlying cause was a transport timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// Use case for executing HTTP requests.
///
/// This struct encapsulates the execution half of the engine: it
/// validates the spec, delegates the wire work to the [`Transport`]
/// port, and turns out-of-range statuses into errors when the spec
/// asks for fail-fast handling.
///
/// # Example
///
/// ```ignore
/// let transport = ReqwestTransport::new()?;
/// let use_case = ExecuteRequest::new(Arc::new(transport));
///
/// let spec = RequestSpec::get("https://httpbin.org/get").build()?;
/// let record = use_case.execute(&spec).await?;
/// ```
pub struct ExecuteRequest<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> ExecuteRequest<T> {
    /// Creates a new `ExecuteRequest` use case over the given transport.
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Executes the request and returns the observed record.
    ///
    /// Execution reports how the exchange went, not whether its content
    /// was desirable: a 404 is a successful execution unless the spec
    /// sets `fail_fast`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Invalid`] if the spec fails validation,
    /// [`ExecuteError::Transport`] if no response came back, and
    /// [`ExecuteError::FailedStatus`] if fail-fast rejected the status.
    pub async fn execute(&self, spec: &RequestSpec) -> ExecuteResult {
        spec.validate()?;

        let record = self.transport.send(spec).await?;

        if spec.fail_fast && !record.status_code().is_success_or_redirect() {
            return Err(ExecuteError::FailedStatus {
                record: Box::new(record),
            });
        }

        Ok(record)
    }
}
