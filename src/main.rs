//! Resource Server Entry Point
//!
//! Initializes logging, loads configuration, registers the demo resources
//! and serves them over HTTP.
//!
//! ```text
//! GET /book?fmt=json
//! GET /book?fmt=html
//! GET /books/gibson?fmt=csv
//! ```

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use resource_server::core::{Config, HttpTransport, ResourceServer};
use resource_server::domains::resources::{
    PathParameters, RequestError, ResourceDefinition, ResourceRegistry,
};

/// A book.
#[derive(Debug, Clone, Serialize)]
struct Book {
    title: String,
    author: String,
}

impl ResourceDefinition for Book {
    const NAME: &'static str = "book";
}

/// Books by an author, looked up by last name.
struct Books;

impl ResourceDefinition for Books {
    const NAME: &'static str = "books";
}

const CATALOGUE: &[(&str, &str, &str)] = &[
    ("Neuromancer", "Gibson, William", "gibson"),
    ("Count Zero", "Gibson, William", "gibson"),
    ("Pandora's Star", "Hamilton, Peter F.", "hamilton"),
];

fn books_by(params: &PathParameters) -> Result<Vec<Book>, RequestError> {
    let last = params.get("author_last")?.to_lowercase();
    let books: Vec<Book> = CATALOGUE
        .iter()
        .filter(|(_, _, key)| *key == last)
        .map(|(title, author, _)| Book {
            title: title.to_string(),
            author: author.to_string(),
        })
        .collect();

    if books.is_empty() {
        return Err(RequestError::not_found(format!("No books by '{}'", last)));
    }
    Ok(books)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);
    config.log_settings();

    config.validate()?;

    info!("Starting {} v{}", config.server.name, config.server.version);

    serve(config).await?;

    info!("Server shutting down");

    Ok(())
}

/// Register the demo resources and serve them until shutdown.
async fn serve(config: Config) -> resource_server::Result<()> {
    let registry = Arc::new(ResourceRegistry::new());
    registry.register_singleton::<Book, _, _>(|_| {
        Ok(Book {
            title: "Neuromancer".to_string(),
            author: "Gibson, William".to_string(),
        })
    });
    registry.register_parameterised::<Books, _, _>("/{author_last}", books_by)?;

    let transport = HttpTransport::new(config.transport.clone());
    let server = ResourceServer::with_registry(config, registry);

    info!("Server initialized");

    transport.run(server).await?;

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
