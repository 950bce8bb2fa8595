//! Resource definitions.
//!
//! A resource type declares the name it is served under. The name is the
//! first segment of the request path and the stem of its template files
//! (`<NAME>.<format>`).
//!
//! ```rust
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
//! ```

/// Trait for types exposed as resources.
pub trait ResourceDefinition {
    /// The resource name. Case-sensitive.
    const NAME: &'static str;
}
