//! Resource server - the top-level request handler.
//!
//! Composes the router and the representation engine into one
//! request/response cycle. Every request produces exactly one response:
//! either the rendered representation with a 200, or the message and status
//! of the first error raised along the way.

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use http::StatusCode;
use tracing::{info, instrument, warn};

use super::config::Config;
use crate::domains::representation::RepresentationEngine;
use crate::domains::resources::{RequestError, ResourceRegistry, ResourceRouter};

/// Content type of error bodies.
pub const ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A complete response, independent of the HTTP library serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    /// Status code.
    pub status: StatusCode,

    /// Value of the `Content-Type` header.
    pub content_type: &'static str,

    /// Response body.
    pub body: Bytes,
}

impl ResourceResponse {
    /// Plain-text response carrying the error's message and status.
    pub fn from_error(err: &RequestError) -> Self {
        Self {
            status: err.code(),
            content_type: ERROR_CONTENT_TYPE,
            body: Bytes::from(err.message().to_string()),
        }
    }
}

/// The resource server.
///
/// Cheap to clone; clones share the registry and the engine.
#[derive(Debug, Clone)]
pub struct ResourceServer {
    config: Arc<Config>,
    router: ResourceRouter,
    engine: Arc<RepresentationEngine>,
}

impl ResourceServer {
    /// Create a server with an empty registry.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, Arc::new(ResourceRegistry::new()))
    }

    /// Create a server over an existing registry.
    pub fn with_registry(config: Config, registry: Arc<ResourceRegistry>) -> Self {
        let engine = RepresentationEngine::from_config(&config.representation, &config.security);
        info!(
            "Serving templates from [{}]",
            engine.templates().root().display()
        );

        Self {
            config: Arc::new(config),
            router: ResourceRouter::new(registry),
            engine: Arc::new(engine),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The registry resources are registered in.
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        self.router.registry()
    }

    /// The representation engine.
    pub fn engine(&self) -> &RepresentationEngine {
        &self.engine
    }

    /// Handle one GET request for `path` with the raw query string `query`.
    #[instrument(skip(self))]
    pub fn handle(&self, path: &str, query: Option<&str>) -> ResourceResponse {
        match self.respond(path, query) {
            Ok(response) => response,
            Err(err) => {
                if err.is_server_error() {
                    warn!("Request for [{}] failed: {}", path, err);
                } else {
                    info!("Request for [{}] rejected: {}", path, err);
                }
                ResourceResponse::from_error(&err)
            }
        }
    }

    fn respond(&self, path: &str, query: Option<&str>) -> Result<ResourceResponse, RequestError> {
        let routed = self.router.route(path)?;
        let format = self.engine.negotiate(query)?;

        let mut body = BytesMut::new().writer();
        let content_type =
            self.engine
                .write(&routed.name, routed.value.as_ref(), &format, &mut body)?;

        Ok(ResourceResponse {
            status: StatusCode::OK,
            content_type,
            body: body.into_inner().freeze(),
        })
    }
}
