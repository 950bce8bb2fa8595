//! Error types and handling for the resource server.
//!
//! Request-level failures are `RequestError` values and never reach this
//! type; `Error` covers startup and infrastructure failures.

use thiserror::Error;

/// A specialized Result type for resource server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the resource server.
#[derive(Debug, Error)]
pub enum Error {
    /// A route pattern failed to compile during registration.
    #[error("Pattern error: {0}")]
    Pattern(#[from] crate::domains::resources::PatternError),

    /// Error originating from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
