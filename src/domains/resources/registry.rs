//! Resource Registry - maps resource names to their route pattern and handler.
//!
//! The registry is an explicit object owned by application startup and shared
//! with the router through an `Arc`. Registrations take the write lock;
//! lookups take the read lock and may run concurrently with each other.
//! Handlers are reference-counted so a lookup releases the lock before the
//! handler runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::definitions::ResourceDefinition;
use super::error::RequestError;
use super::params::PathParameters;
use super::pattern::{PatternError, RoutePattern};
use crate::domains::representation::Representable;

/// The value produced by a handler, type-erased for rendering.
pub type ResourceValue = Box<dyn Representable>;

/// A type-erased GET handler.
pub type Handler =
    Arc<dyn Fn(&PathParameters) -> Result<ResourceValue, RequestError> + Send + Sync>;

/// A registered resource.
#[derive(Clone)]
pub struct RegistryEntry {
    name: String,
    pattern: RoutePattern,
    handler: Handler,
}

impl RegistryEntry {
    /// The resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The route pattern applied to the path after the resource name.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Invoke the handler.
    pub fn invoke(&self, params: &PathParameters) -> Result<ResourceValue, RequestError> {
        (self.handler)(params)
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Concurrency-safe registry of GET resources.
#[derive(Default)]
pub struct ResourceRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`, replacing any earlier registration
    /// of the same name.
    pub fn register<F, T>(&self, name: impl Into<String>, pattern: RoutePattern, handler: F)
    where
        F: Fn(&PathParameters) -> Result<T, RequestError> + Send + Sync + 'static,
        T: Representable + 'static,
    {
        let name = name.into();
        let handler: Handler = Arc::new(move |params: &PathParameters| {
            handler(params).map(|value| Box::new(value) as ResourceValue)
        });

        if pattern.is_root() {
            info!("Registering GET handler for [{}]", name);
        } else {
            info!("Registering GET handler for [{}] with [{}]", name, pattern);
        }

        let entry = RegistryEntry {
            name: name.clone(),
            pattern,
            handler,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, entry);
    }

    /// Register a root-level resource served at `/<R::NAME>`.
    pub fn register_singleton<R, F, T>(&self, handler: F)
    where
        R: ResourceDefinition,
        F: Fn(&PathParameters) -> Result<T, RequestError> + Send + Sync + 'static,
        T: Representable + 'static,
    {
        self.register(R::NAME, RoutePattern::root(), handler);
    }

    /// Register a resource served at `/<R::NAME>` followed by `pattern`.
    pub fn register_parameterised<R, F, T>(&self, pattern: &str, handler: F) -> Result<(), PatternError>
    where
        R: ResourceDefinition,
        F: Fn(&PathParameters) -> Result<T, RequestError> + Send + Sync + 'static,
        T: Representable + 'static,
    {
        let pattern = RoutePattern::compile(pattern)?;
        self.register(R::NAME, pattern, handler);
        Ok(())
    }

    /// Look up a resource by name.
    pub fn lookup(&self, name: &str) -> Option<RegistryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Remove every registration.
    ///
    /// Intended for test isolation; requests routed concurrently may see
    /// either the old or the empty registry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("names", &self.names())
            .finish()
    }
}
