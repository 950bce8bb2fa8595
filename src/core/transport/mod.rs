//! Transport layer for the resource server.
//!
//! The HTTP transport (feature `http`, on by default) serves every GET path
//! through [`ResourceServer::handle`](crate::core::ResourceServer::handle).
//! Configuration and error types are always available.

mod config;
mod error;

#[cfg(feature = "http")]
pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};

#[cfg(feature = "http")]
pub use http::HttpTransport;
