//! On-disk template store.
//!
//! Templates are located by naming convention, `<root>/<resource>.<format>`,
//! and read on every render so edits are picked up without a restart.
//! HTML-family formats are rendered with HTML auto-escaping; every other
//! format is rendered raw and the template is trusted to quote correctly
//! (a CSV template encloses fields in double quotes, for example).
//!
//! Template output is returned exactly, including a trailing newline. HTML
//! escaping also turns `/` into `&#x2f;`, which browsers render unchanged.

use std::io;
use std::path::PathBuf;

use minijinja::value::ValueKind;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value, context};
use thiserror::Error;
use tracing::debug;

use crate::core::config::{RepresentationConfig, SecurityConfig};
use crate::core::security::{PathSecurityError, validate_path};

/// Errors raised while loading or rendering a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template exists for the resource/format pair.
    #[error("Template [{path}] does not exist")]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The template resolves outside the template root, or is a disallowed
    /// symlink.
    #[error("Template [{path}] rejected: {source}")]
    Rejected {
        path: PathBuf,
        #[source]
        source: PathSecurityError,
    },

    /// The template exists but could not be read.
    #[error("Unable to read template [{path}]: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The template could not be parsed.
    #[error("Unable to parse template [{name}]: {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// Binding the value into the template failed.
    #[error("Unable to process template [{name}]: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Loads and renders `<resource>.<format>` templates from a root directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
    html_formats: Vec<String>,
    allow_symlinks: bool,
}

impl TemplateStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, html_formats: Vec<String>, allow_symlinks: bool) -> Self {
        Self {
            root: root.into(),
            html_formats,
            allow_symlinks,
        }
    }

    /// Create a store from configuration.
    pub fn from_config(representation: &RepresentationConfig, security: &SecurityConfig) -> Self {
        Self::new(
            representation.template_root.clone(),
            representation.html_formats.clone(),
            security.allow_symlinks,
        )
    }

    /// The template root directory.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Template identifier for a resource/format pair.
    pub fn template_name(resource: &str, format: &str) -> String {
        format!("{}.{}", resource, format)
    }

    /// Whether `format` is rendered with HTML auto-escaping.
    pub fn is_html(&self, format: &str) -> bool {
        self.html_formats.iter().any(|f| f == format)
    }

    /// Read the template source for a resource/format pair.
    pub fn load(&self, resource: &str, format: &str) -> Result<String, TemplateError> {
        let path = self.root.join(Self::template_name(resource, format));
        let path = validate_path(&path, &self.root, self.allow_symlinks).map_err(|e| match e {
            PathSecurityError::PathNotFound { error, .. } => TemplateError::Missing {
                path: path.clone(),
                source: error,
            },
            PathSecurityError::IoError { error, .. } => TemplateError::Read {
                path: path.clone(),
                source: error,
            },
            other => TemplateError::Rejected {
                path: path.clone(),
                source: other,
            },
        })?;

        debug!("Loading template [{}]", path.display());
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TemplateError::Missing { path, source: e },
            _ => TemplateError::Read { path, source: e },
        })
    }

    /// Render `value` with the template for `resource` in `format`.
    ///
    /// Map values (structs) expose their fields at the top level; any other
    /// value is bound as `this`. Undefined variables are errors.
    pub fn render(&self, resource: &str, format: &str, value: Value) -> Result<String, TemplateError> {
        let source = self.load(resource, format)?;
        let name = Self::template_name(resource, format);

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        let escape = if self.is_html(format) {
            AutoEscape::Html
        } else {
            AutoEscape::None
        };
        env.set_auto_escape_callback(move |_| escape.clone());

        let template = env
            .template_from_named_str(&name, &source)
            .map_err(|e| TemplateError::Parse {
                name: name.clone(),
                source: e,
            })?;

        let ctx = match value.kind() {
            ValueKind::Map => value,
            _ => context! { this => value },
        };

        template.render(ctx).map_err(|e| TemplateError::Render {
            name: name.clone(),
            source: e,
        })
    }
}
