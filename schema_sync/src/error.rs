//! Error types for SchemaSync

use thiserror::Error;

/// Result type for SchemaSync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SchemaSync
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A database could not be opened or queried. Fatal for the run.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The table disappeared between listing and fetching its definition.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// One table's definition could not be fetched. The table is skipped.
    #[error("Introspection error on table `{table}`: {reason}")]
    IntrospectionError { table: String, reason: String },

    /// A DDL statement failed. Statements applied before it stay applied.
    #[error("Execution error: {message} (statement: {statement})")]
    ExecutionError { statement: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Whether the error is localized to a single table and the run can go on
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::IntrospectionError { .. })
    }
}

/// Convert Serde JSON errors to SchemaSync errors
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

/// Convert TOML deserialization errors to SchemaSync errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}
