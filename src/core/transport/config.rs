//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Path of the health endpoint. Shadows a resource of the same name.
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_cors() -> bool {
    true
}

fn default_health_path() -> String {
    "/_health".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            enable_cors: default_cors(),
            health_path: default_health_path(),
        }
    }
}

impl HttpConfig {
    /// Create an HTTP config for the given port and host.
    pub fn new(port: u16, host: impl Into<String>) -> Self {
        Self {
            port,
            host: host.into(),
            ..Default::default()
        }
    }

    /// Load HTTP config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("RESOURCE_HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let host = std::env::var("RESOURCE_HTTP_HOST").unwrap_or_else(|_| default_host());
        let enable_cors = std::env::var("RESOURCE_HTTP_CORS")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);
        let health_path =
            std::env::var("RESOURCE_HTTP_HEALTH_PATH").unwrap_or_else(|_| default_health_path());
        Self {
            port,
            host,
            enable_cors,
            health_path,
        }
    }

    /// The bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        format!("HTTP on {}", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address() {
        let config = HttpConfig::new(9000, "0.0.0.0");
        assert_eq!(config.address(), "0.0.0.0:9000");
        assert_eq!(config.health_path, "/_health");
        assert!(config.enable_cors);
    }
}
