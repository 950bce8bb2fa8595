//! Domains module containing business logic organized by bounded contexts.
//!
//! - **resources**: registration and routing of GET resources
//! - **representation**: rendering resource values as JSON or templates

pub mod representation;
pub mod resources;
