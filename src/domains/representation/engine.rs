//! Representation engine - turns a resource value into response bytes.
//!
//! JSON is built in. Every other format is rendered from a template named
//! after the resource and the format. Output is fully rendered into memory
//! before anything is written to the sink, so a failing template never
//! produces partial output.

use std::io::Write;

use tracing::{debug, error, warn};

use super::format::{self, JSON};
use super::templates::{TemplateError, TemplateStore};
use super::value::Representable;
use crate::core::config::{RepresentationConfig, SecurityConfig};
use crate::domains::resources::RequestError;

/// A fully rendered representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The normalised format that was rendered.
    pub format: String,

    /// Content type matching the format.
    pub content_type: &'static str,

    /// The response body.
    pub bytes: Vec<u8>,
}

impl Rendered {
    /// Write the rendered bytes to `sink`.
    ///
    /// A write failure is logged and reported as a 500; it is never retried.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<(), RequestError> {
        sink.write_all(&self.bytes).map_err(|e| {
            error!(
                "Unable to write response [{}]: {}",
                String::from_utf8_lossy(&self.bytes),
                e
            );
            RequestError::internal(e)
        })
    }
}

/// Renders resource values as JSON or through on-disk templates.
#[derive(Debug, Clone)]
pub struct RepresentationEngine {
    templates: TemplateStore,
    default_format: String,
    formats: Option<Vec<String>>,
}

impl RepresentationEngine {
    /// Create an engine.
    ///
    /// `formats` is an optional allow-list of template formats. JSON is
    /// always available.
    pub fn new(
        templates: TemplateStore,
        default_format: impl Into<String>,
        formats: Option<Vec<String>>,
    ) -> Self {
        Self {
            templates,
            default_format: default_format.into(),
            formats,
        }
    }

    /// Create an engine from configuration.
    pub fn from_config(representation: &RepresentationConfig, security: &SecurityConfig) -> Self {
        Self::new(
            TemplateStore::from_config(representation, security),
            representation.default_format.clone(),
            representation.formats.clone(),
        )
    }

    /// The template store.
    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Pick the format for a raw query string, falling back to the default.
    pub fn negotiate(&self, query: Option<&str>) -> Result<String, RequestError> {
        let requested = format::requested_format(query)?;
        Ok(requested.unwrap_or_else(|| self.default_format.clone()))
    }

    /// Render `value`, produced by the resource `resource`, in `format`.
    pub fn render(
        &self,
        resource: &str,
        value: &dyn Representable,
        format: &str,
    ) -> Result<Rendered, RequestError> {
        let format = format::normalize(format)?;

        let bytes = if format == JSON {
            self.render_json(resource, value)?
        } else {
            self.render_template(resource, value, &format)?
        };

        debug!("Rendered [{}] as [{}] ({} bytes)", resource, format, bytes.len());
        Ok(Rendered {
            content_type: format::content_type(&format),
            format,
            bytes,
        })
    }

    /// Render `value` and write it to `sink`.
    ///
    /// Nothing is written unless rendering succeeds. Returns the content type
    /// of what was written.
    pub fn write<W: Write + ?Sized>(
        &self,
        resource: &str,
        value: &dyn Representable,
        format: &str,
        sink: &mut W,
    ) -> Result<&'static str, RequestError> {
        let rendered = self.render(resource, value, format)?;
        rendered.write_to(sink)?;
        Ok(rendered.content_type)
    }

    fn render_json(&self, resource: &str, value: &dyn Representable) -> Result<Vec<u8>, RequestError> {
        value.to_json().map_err(|e| {
            error!("Unable to marshal instance of [{}] as JSON: {}", resource, e);
            RequestError::internal(e)
        })
    }

    fn render_template(
        &self,
        resource: &str,
        value: &dyn Representable,
        format: &str,
    ) -> Result<Vec<u8>, RequestError> {
        let allow_listed = match &self.formats {
            Some(formats) if !formats.iter().any(|f| f == format) => {
                warn!("Format [{}] is not in the supported list", format);
                return Err(RequestError::unsupported_format(format));
            }
            Some(_) => true,
            None => false,
        };

        self.templates
            .render(resource, format, value.to_template_value())
            .map(String::into_bytes)
            .map_err(|e| match e {
                TemplateError::Missing { .. } if allow_listed => {
                    error!(
                        "Format [{}] is supported but [{}] has no template: {}",
                        format, resource, e
                    );
                    RequestError::internal(e)
                }
                TemplateError::Missing { .. } => {
                    warn!("{} ([{}] as [{}])", e, resource, format);
                    RequestError::unsupported_format(format).with_cause(e)
                }
                other => {
                    error!("{} ([{}] as [{}])", other, resource, format);
                    RequestError::internal(other)
                }
            })
    }
}
