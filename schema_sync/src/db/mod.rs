//! Database module for SchemaSync
//!
//! This module handles database connections, statement execution and
//! migration scripts.

pub mod catalog;
pub mod connection;
pub mod executor;
pub mod migrations;

// Re-export key types
pub use catalog::Catalog;
pub use connection::DatabaseConnection;
pub use executor::{ExecutionOutcome, Reporter, SqlExecutor};
