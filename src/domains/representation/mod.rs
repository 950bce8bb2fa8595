//! Representation domain module.
//!
//! Turns the value returned by a resource handler into response bytes in the
//! format the client asked for: compact JSON, or the output of a
//! `<resource>.<format>` template from the template root.
//!
//! ## Architecture
//!
//! - `value.rs` - `Representable`, implemented for every `Serialize` type
//! - `format.rs` - `fmt` query parameter negotiation and content types
//! - `templates.rs` - On-disk template store (minijinja)
//! - `engine.rs` - `RepresentationEngine`, the JSON/template decision and
//!   its error classification

mod engine;
pub mod format;
mod templates;
mod value;

pub use engine::{Rendered, RepresentationEngine};
pub use templates::{TemplateError, TemplateStore};
pub use value::Representable;
