//! Resources domain module.
//!
//! Resources are named values retrievable with GET. Application code
//! registers a handler per resource name, optionally with a route pattern
//! for path parameters; the router resolves incoming paths to those handlers.
//!
//! ## Architecture
//!
//! - `definitions.rs` - `ResourceDefinition` trait (the resource name)
//! - `pattern.rs` - Route patterns and path parameter extraction
//! - `params.rs` - `PathParameters` handed to handlers
//! - `registry.rs` - Concurrency-safe name -> handler registry
//! - `router.rs` - Path resolution and handler dispatch
//! - `error.rs` - `RequestError`, the error value of the whole pipeline
//!
//! ## Adding a New Resource
//!
//! 1. Implement `ResourceDefinition` for your type
//! 2. Call `register_singleton` or `register_parameterised` at startup

pub mod definitions;
mod error;
mod params;
mod pattern;
mod registry;
mod router;

pub use definitions::ResourceDefinition;
pub use error::{BoxError, INTERNAL_SERVER_ERROR_MESSAGE, RequestError};
pub use params::PathParameters;
pub use pattern::{PatternError, RoutePattern};
pub use registry::{Handler, RegistryEntry, ResourceRegistry, ResourceValue};
pub use router::{ResourceRouter, RoutedResource, resolve};
