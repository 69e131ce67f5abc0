//! Configuration handling for SchemaSync

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};

/// Load configuration from a TOML file
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;

    Ok(config)
}

/// Represents the complete SchemaSync configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// The database whose schema is authoritative
    #[serde(default)]
    pub source: DatabaseConfig,
    /// The database that gets altered
    #[serde(default)]
    pub target: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    /// Check that both sides have a connection string
    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() || self.target.url.trim().is_empty() {
            return Err(Error::ConfigError(
                "source and target connection strings are both required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database connection configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    pub pool_size: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// Synchronization behaviour
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SyncConfig {
    /// Compute and print the statements without executing them
    #[serde(default)]
    pub dry_run: bool,
    /// Directory to write the planned statements to as a `.sql` script
    pub script_directory: Option<String>,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "text".to_string(),
            stdout: true,
        }
    }
}
