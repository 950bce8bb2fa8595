//! Request Router - resolves a request path to a registered handler and
//! invokes it.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::error::RequestError;
use super::registry::{ResourceRegistry, ResourceValue};

/// The result of a successful dispatch.
pub struct RoutedResource {
    /// Name of the resource that produced the value.
    pub name: String,

    /// The handler's return value.
    pub value: ResourceValue,
}

impl fmt::Debug for RoutedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutedResource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Split a request path into the resource name and the remainder.
///
/// `/book/hamilton/peter` resolves to `("book", "/hamilton/peter")`.
/// Paths without a leading `/` are rejected with a 400; an empty resource
/// name (`/`) is a 404.
pub fn resolve(path: &str) -> Result<(&str, &str), RequestError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(RequestError::bad_request("Malformed request path")
            .with_cause(format!("path '{}' does not start with '/'", path)));
    };

    let (name, remainder) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    if name.is_empty() {
        return Err(RequestError::not_found("Invalid resource type")
            .with_cause(format!("no resource type in path '{}'", path)));
    }

    Ok((name, remainder))
}

/// Routes request paths through a [`ResourceRegistry`].
#[derive(Debug, Clone)]
pub struct ResourceRouter {
    registry: Arc<ResourceRegistry>,
}

impl ResourceRouter {
    /// Create a router over the given registry.
    pub fn new(registry: Arc<ResourceRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this router reads from.
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Route a request path to its handler and return the handler's result.
    ///
    /// Errors returned by the handler are passed through unchanged.
    #[instrument(skip(self))]
    pub fn route(&self, path: &str) -> Result<RoutedResource, RequestError> {
        let (name, remainder) = resolve(path)?;
        info!("GET request for [{}] [{}]", name, remainder);

        let Some(entry) = self.registry.lookup(name) else {
            warn!("No handler registered for {}", name);
            return Err(RequestError::not_found("Invalid resource type")
                .with_cause(format!("No handler registered for {}", name)));
        };
        debug!("Found GET handler for [{}] with [{}]", name, entry.pattern());

        let params = entry.pattern().extract(remainder)?;
        let value = entry.invoke(&params)?;

        Ok(RoutedResource {
            name: entry.name().to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::resources::{PathParameters, ResourceDefinition, RoutePattern};
    use http::StatusCode;
    use serde::Serialize;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Serialize)]
    struct Book {
        title: String,
        author: String,
    }

    impl ResourceDefinition for Book {
        const NAME: &'static str = "book";
    }

    fn neuromancer() -> Book {
        Book {
            title: "Neuromancer".to_string(),
            author: "Gibson, William".to_string(),
        }
    }

    fn json(routed: &RoutedResource) -> String {
        String::from_utf8(routed.value.to_json().unwrap()).unwrap()
    }

    fn router() -> (Arc<ResourceRegistry>, ResourceRouter) {
        let registry = Arc::new(ResourceRegistry::new());
        (Arc::clone(&registry), ResourceRouter::new(registry))
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("/book").unwrap(), ("book", ""));
        assert_eq!(resolve("/book/").unwrap(), ("book", "/"));
        assert_eq!(
            resolve("/book/hamilton/peter_f").unwrap(),
            ("book", "/hamilton/peter_f")
        );
    }

    #[test]
    fn test_resolve_malformed() {
        let err = resolve("book").unwrap_err();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Malformed request path");

        let err = resolve("").unwrap_err();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);

        let err = resolve("/").unwrap_err();
        assert_eq!(err.code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Invalid resource type");
    }

    #[test]
    fn test_route_singleton() {
        let (registry, router) = router();
        registry.register_singleton::<Book, _, _>(|_| Ok(neuromancer()));

        let routed = router.route("/book").unwrap();
        assert_eq!(routed.name, "book");
        assert_eq!(
            json(&routed),
            r#"{"title":"Neuromancer","author":"Gibson, William"}"#
        );
    }

    #[test]
    fn test_route_collection() {
        let (registry, router) = router();
        registry.register_singleton::<Book, _, _>(|_| {
            Ok(vec![
                neuromancer(),
                Book {
                    title: "Pandora's Star".to_string(),
                    author: "Peter F. Hamilton".to_string(),
                },
            ])
        });

        let routed = router.route("/book").unwrap();
        assert_eq!(
            json(&routed),
            r#"[{"title":"Neuromancer","author":"Gibson, William"},{"title":"Pandora's Star","author":"Peter F. Hamilton"}]"#
        );
    }

    #[test]
    fn test_route_unknown_type_never_invokes_handler() {
        let (registry, router) = router();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.register_singleton::<Book, _, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(neuromancer())
        });

        let err = router.route("/rook").unwrap_err();
        assert_eq!(err.code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Invalid resource type");
        assert_eq!(
            err.cause().map(|c| c.to_string()).as_deref(),
            Some("No handler registered for rook")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_route_passes_handler_errors_through() {
        let (registry, router) = router();
        registry.register_singleton::<Book, _, _>(|_| -> Result<Book, RequestError> {
            Err(RequestError::bad_request("errorResourceHandler").with_cause("handler failed"))
        });

        let err = router.route("/book").unwrap_err();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "errorResourceHandler");
        assert_eq!(
            err.cause().map(|c| c.to_string()).as_deref(),
            Some("handler failed")
        );
    }

    #[test]
    fn test_route_passes_parameters_by_name() {
        let (registry, router) = router();
        let seen = Arc::new(Mutex::new(HashMap::new()));
        let acc = Arc::clone(&seen);
        registry
            .register_parameterised::<Book, _, _>(
                "/{author_last}/{author_first}",
                move |params: &PathParameters| {
                    let mut acc = acc.lock().unwrap();
                    for (k, v) in params.iter() {
                        acc.insert(k.to_string(), v.to_string());
                    }
                    Ok(())
                },
            )
            .unwrap();

        router.route("/book/hamilton/peter_f").unwrap();

        let expected: HashMap<String, String> = [
            ("author_last".to_string(), "hamilton".to_string()),
            ("author_first".to_string(), "peter_f".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(*seen.lock().unwrap(), expected);
    }

    #[test]
    fn test_route_replaced_handler_is_not_invoked() {
        let (registry, router) = router();
        let old_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&old_calls);
        registry.register_singleton::<Book, _, _>(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("old")
        });
        registry.register("book", RoutePattern::root(), |_| Ok("new"));

        let routed = router.route("/book").unwrap();
        assert_eq!(json(&routed), r#""new""#);
        assert_eq!(old_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_route_path_mismatch() {
        let (registry, router) = router();
        registry
            .register_parameterised::<Book, _, _>("/{author_last}/{author_first}", |_| Ok(()))
            .unwrap();

        let err = router.route("/book/hamilton").unwrap_err();
        assert_eq!(err.code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Invalid resource path");
    }
}
