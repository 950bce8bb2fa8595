//! HTTP transport implementation.
//!
//! Every GET (and HEAD) request that is not the health endpoint is handed to
//! the resource server. Handlers and templates are synchronous, so each
//! request runs on the blocking pool.

use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::ResourceServer;
use crate::core::server::{ERROR_CONTENT_TYPE, ResourceResponse};
use crate::domains::resources::INTERNAL_SERVER_ERROR_MESSAGE;

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl IntoResponse for ResourceResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the axum router serving `server`.
    pub fn router(&self, server: ResourceServer) -> Router {
        let mut app = Router::new()
            .route(&self.config.health_path, get(health_check))
            .fallback(handle_resource)
            .with_state(server)
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::HEAD])
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport.
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(self, server: ResourceServer) -> TransportResult<()> {
        let addr = self.address();
        info!("Starting transport: {}", self.config.description());

        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Resources: GET /{{resource}}[/...]?fmt={{format}}");
        info!("  → Health:    GET {}", self.config.health_path);

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Health check endpoint.
async fn health_check(State(server): State<ResourceServer>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "name": server.name(),
        "version": server.version(),
        "resources": server.registry().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Serve a resource request.
#[instrument(skip_all, fields(path = %uri.path()))]
async fn handle_resource(
    State(server): State<ResourceServer>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [
                (header::CONTENT_TYPE, ERROR_CONTENT_TYPE),
                (header::ALLOW, "GET, HEAD"),
            ],
            "Method not allowed",
        )
            .into_response();
    }

    let result = tokio::task::spawn_blocking(move || server.handle(uri.path(), uri.query())).await;

    match result {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!("Resource handler task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, ERROR_CONTENT_TYPE)],
                INTERNAL_SERVER_ERROR_MESSAGE,
            )
                .into_response()
        }
    }
}
