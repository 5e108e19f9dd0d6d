//! Configuration loading and management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `server.host:server.port`
pub const ENV_ADDR: &str = "INVOICE_API_ADDR";
/// Environment variable overriding `storage.url` (and selecting SQLite)
pub const ENV_DATABASE_URL: &str = "INVOICE_API_DATABASE_URL";
/// Environment variable overriding `seed`
pub const ENV_SEED: &str = "INVOICE_API_SEED";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },

    #[error("Storage backend '{0}' requires the `{0}` feature")]
    BackendUnavailable(String),
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix under which the invoice routes are mounted
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_prefix: "/api".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Available storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Connection URL, required by the SQLite backend
    pub url: Option<String>,
}

/// Complete application configuration
///
/// # Example
///
/// ```yaml
/// server:
///   host: 0.0.0.0
///   port: 8080
/// storage:
///   backend: sqlite
///   url: sqlite://invoices.db
/// seed: 10
/// log_level: info,invoice_api=debug
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    /// Number of sample invoices created at startup
    pub seed: usize,
    /// Default tracing filter, used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            seed: 0,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_ADDR) {
            let (host, port) = addr
                .rsplit_once(':')
                .and_then(|(host, port)| Some((host, port.parse::<u16>().ok()?)))
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_ADDR.to_string(),
                    value: addr.clone(),
                })?;
            self.server.host = host.to_string();
            self.server.port = port;
        }

        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.storage.backend = StorageBackend::Sqlite;
            self.storage.url = Some(url);
        }

        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = seed.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_SEED.to_string(),
                value: seed.clone(),
            })?;
        }

        Ok(self)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }
}
