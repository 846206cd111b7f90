//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// File storage configuration.
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// File storage configuration as loaded from config sources.
///
/// Translated into a `bulletin_core::storage::StorageConfig` by the server
/// binary; kept as plain strings here so the shared crate stays free of
/// storage dependencies.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage backend: `local` or `s3`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory for the `local` provider.
    #[serde(default = "default_root")]
    pub root: String,
    /// Bucket name for the `s3` provider.
    #[serde(default)]
    pub bucket: String,
    /// Endpoint URL for the `s3` provider.
    #[serde(default)]
    pub endpoint: String,
    /// Region for the `s3` provider.
    #[serde(default)]
    pub region: String,
    /// Access key id for the `s3` provider.
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key for the `s3` provider.
    #[serde(default)]
    pub secret_access_key: String,
    /// Maximum accepted size of a single uploaded file, in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_root() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BULLETIN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
