//! Request error type shared by the routing and representation pipeline.

use http::StatusCode;
use thiserror::Error;

/// Message sent to clients for every 500-class failure.
///
/// The underlying cause is logged, never sent.
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "An internal server error has occured.";

/// Boxed error used as the diagnostic cause of a [`RequestError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure while serving a resource request.
///
/// Carries the HTTP status to respond with, the message shown to the client
/// and, optionally, the underlying cause for diagnostics. Handlers return it
/// to classify their own failures (for example a 400 for a bad parameter).
#[derive(Debug, Error)]
#[error("{message} ({code})")]
pub struct RequestError {
    code: StatusCode,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl RequestError {
    /// Create an error with the given status and client-facing message.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Create a 400 error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 404 error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create a 406 error for a representation format nobody can produce.
    pub fn unsupported_format(format: &str) -> Self {
        Self::new(
            StatusCode::NOT_ACCEPTABLE,
            format!("'{}' is not a supported format", format),
        )
    }

    /// Create a 500 error with the fixed generic message.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_SERVER_ERROR_MESSAGE,
        )
        .with_cause(cause)
    }

    /// The HTTP status code.
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// The message sent to the client.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying cause, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Whether this is a 5xx error.
    pub fn is_server_error(&self) -> bool {
        self.code.is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_hides_cause() {
        let err = RequestError::internal("disk on fire");
        assert_eq!(err.code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_SERVER_ERROR_MESSAGE);
        assert!(err.is_server_error());
        assert_eq!(err.cause().map(|c| c.to_string()).as_deref(), Some("disk on fire"));
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = RequestError::unsupported_format("missing");
        assert_eq!(err.code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(err.message(), "'missing' is not a supported format");
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = RequestError::not_found("Invalid resource type").with_cause(io);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Invalid resource type (404 Not Found)");
    }
}
