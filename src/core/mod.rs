//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the resource
//! server, including error handling, configuration, template path security,
//! the top-level request handler and the HTTP transport.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{PathSecurityError, validate_path};
pub use server::{ResourceResponse, ResourceServer};
pub use transport::{HttpConfig, TransportError};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
