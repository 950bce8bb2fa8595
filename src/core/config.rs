//! Configuration management for the resource server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::error::{Error, Result};
use super::transport::HttpConfig;
use crate::domains::representation::format;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the resource server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Representation (JSON/template) configuration.
    pub representation: RepresentationConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// Template path security configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server, used in logs and the health endpoint.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the representation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepresentationConfig {
    /// Directory holding `<resource>.<format>` templates.
    pub template_root: PathBuf,

    /// Format used when the request has no `fmt` parameter.
    pub default_format: String,

    /// Optional allow-list of template formats. When set, other formats are
    /// rejected with 406 and a listed format without a template is a 500.
    pub formats: Option<Vec<String>>,

    /// Formats rendered with HTML auto-escaping.
    pub html_formats: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for template path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Whether templates may be symlinks. Targets must still resolve inside
    /// the template root.
    pub allow_symlinks: bool,
}

impl Default for RepresentationConfig {
    fn default() -> Self {
        Self {
            template_root: PathBuf::from("templates"),
            default_format: format::JSON.to_string(),
            formats: None,
            html_formats: vec!["html".to_string(), "htm".to_string(), "xhtml".to_string()],
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "resource-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            representation: RepresentationConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `RESOURCE_`.
    /// For example: `RESOURCE_SERVER_NAME`, `RESOURCE_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("RESOURCE_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("RESOURCE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(root) = std::env::var("RESOURCE_TEMPLATE_ROOT") {
            config.representation.template_root = PathBuf::from(root);
        }

        if let Ok(default_format) = std::env::var("RESOURCE_DEFAULT_FORMAT") {
            config.representation.default_format = default_format.trim().to_lowercase();
        }

        if let Ok(formats) = std::env::var("RESOURCE_FORMATS") {
            config.representation.formats = Some(parse_list(&formats));
        }

        if let Ok(html_formats) = std::env::var("RESOURCE_HTML_FORMATS") {
            config.representation.html_formats = parse_list(&html_formats);
        }

        if let Ok(allow_symlinks) = std::env::var("RESOURCE_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
        }

        config.transport = HttpConfig::from_env();

        config
    }

    /// Check the configuration for values the server cannot work with.
    pub fn validate(&self) -> Result<()> {
        let default_format = &self.representation.default_format;
        if format::normalize(default_format).ok().as_ref() != Some(default_format) {
            return Err(Error::config(format!(
                "invalid default format '{}'",
                default_format
            )));
        }

        if let Some(formats) = &self.representation.formats {
            if formats.is_empty() {
                return Err(Error::config("the supported format list is empty"));
            }
            if let Some(bad) = formats
                .iter()
                .find(|f| format::normalize(f).ok().as_ref() != Some(*f))
            {
                return Err(Error::config(format!("invalid supported format '{}'", bad)));
            }
            if default_format != format::JSON && !formats.contains(default_format) {
                return Err(Error::config(format!(
                    "default format '{}' is not in the supported format list",
                    default_format
                )));
            }
        }

        if !self.transport.health_path.starts_with('/') {
            return Err(Error::config(format!(
                "health path '{}' must start with '/'",
                self.transport.health_path
            )));
        }

        Ok(())
    }

    /// Log the settings that change how requests are served.
    ///
    /// Called once logging is initialized.
    pub fn log_settings(&self) {
        let representation = &self.representation;
        info!(
            "Templates: root [{}], default format [{}]",
            representation.template_root.display(),
            representation.default_format
        );
        match &representation.formats {
            Some(formats) => info!("Supported template formats: {:?}", formats),
            None => warn!(
                "RESOURCE_FORMATS not set - any format with a matching template \
                 will be served."
            ),
        }
        info!("Template symlinks allowed: {}", self.security.allow_symlinks);
    }
}

/// Split a comma-separated list into trimmed, lower-cased, non-empty items.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.representation.default_format, "json");
        assert_eq!(config.representation.template_root, PathBuf::from("templates"));
        assert!(config.representation.formats.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_formats_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("RESOURCE_FORMATS", "HTML, csv,,txt");
            std::env::set_var("RESOURCE_TEMPLATE_ROOT", "/srv/templates");
        }
        let config = Config::from_env();
        assert_eq!(
            config.representation.formats,
            Some(vec!["html".to_string(), "csv".to_string(), "txt".to_string()])
        );
        assert_eq!(
            config.representation.template_root,
            PathBuf::from("/srv/templates")
        );
        unsafe {
            std::env::remove_var("RESOURCE_FORMATS");
            std::env::remove_var("RESOURCE_TEMPLATE_ROOT");
        }
    }

    #[test]
    fn test_formats_unset_means_open() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("RESOURCE_FORMATS");
        }
        let config = Config::from_env();
        assert!(config.representation.formats.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.representation.default_format = "../json".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.representation.formats = Some(Vec::new());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.representation.formats = Some(vec!["HTML".to_string()]);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transport.health_path = "health".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default_format_against_formats() {
        let mut config = Config::default();
        config.representation.default_format = "html".to_string();
        config.representation.formats = Some(vec!["csv".to_string()]);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.representation.formats = Some(vec!["csv".to_string(), "html".to_string()]);
        assert!(config.validate().is_ok());

        config.representation.default_format = "json".to_string();
        config.representation.formats = Some(vec!["csv".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logged_settings(config: &Config) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || config.log_settings());
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_log_settings() {
        let config = Config::default();
        let out = logged_settings(&config);
        assert!(out.contains("RESOURCE_FORMATS not set"));
        assert!(out.contains("Template symlinks allowed: true"));

        let mut config = Config::default();
        config.representation.formats = Some(vec!["csv".to_string()]);
        let out = logged_settings(&config);
        assert!(out.contains("Supported template formats: [\"csv\"]"));
        assert!(!out.contains("RESOURCE_FORMATS not set"));
    }

    #[test]
    fn test_from_env_does_not_log() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("RESOURCE_FORMATS");
        }
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, Config::from_env);
        assert!(logs.0.lock().unwrap().is_empty());
    }
}
