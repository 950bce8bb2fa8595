//! Values that can be represented.

use serde::Serialize;

/// A resource value that can be rendered as JSON or bound into a template.
///
/// Implemented for every `Serialize` type, so handlers return plain structs,
/// vectors or maps.
pub trait Representable: Send + Sync {
    /// Compact JSON, fields in declaration order.
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;

    /// The value as seen by templates.
    fn to_template_value(&self) -> minijinja::Value;
}

impl<T> Representable for T
where
    T: Serialize + Send + Sync,
{
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    fn to_template_value(&self) -> minijinja::Value {
        minijinja::Value::from_serialize(self)
    }
}
