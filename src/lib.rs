//! Resource Server Library
//!
//! A small REST resource framework. Application code registers a handler per
//! resource name, optionally with a route pattern such as
//! `/{author_last}/{author_first}`; GET requests are routed to the handler
//! and its return value is rendered as JSON or through a
//! `<resource>.<format>` template chosen with the `fmt` query parameter.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, template path security, the top-level
//!   request handler (`ResourceServer`) and the HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **resources**: registry, route patterns and the router
//!   - **representation**: JSON and template rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use resource_server::core::{Config, ResourceServer};
//! use resource_server::domains::resources::ResourceDefinition;
//!
//! #[derive(serde::Serialize)]
//! struct Book {
//!     title: String,
//!     author: String,
//! }
//!
//! impl ResourceDefinition for Book {
//!     const NAME: &'static str = "book";
//! }
//!
//! let server = ResourceServer::new(Config::from_env());
//! server.registry().register_singleton::<Book, _, _>(|_| {
//!     Ok(Book {
//!         title: "Neuromancer".to_string(),
//!         author: "Gibson, William".to_string(),
//!     })
//! });
//!
//! let response = server.handle("/book", Some("fmt=json"));
//! assert_eq!(response.status, http::StatusCode::OK);
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, ResourceServer, Result};
pub use crate::domains::resources::{PathParameters, RequestError, ResourceDefinition};
