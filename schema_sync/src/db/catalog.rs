//! Catalog access
//!
//! The narrow set of operations the sync engine needs from a database.

use async_trait::async_trait;

use crate::error::Result;

/// Introspection and DDL capability of one database
///
/// Implemented by [`DatabaseConnection`](crate::db::connection::DatabaseConnection)
/// for live MySQL servers. Every call issues exactly one statement; nothing is
/// cached at this level.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List the base tables of the database, in catalog order
    ///
    /// Fails with [`Error::ConnectionError`](crate::Error::ConnectionError).
    async fn list_table_names(&self) -> Result<Vec<String>>;

    /// Fetch the `CREATE TABLE` statement of a table
    ///
    /// Fails with [`Error::TableNotFound`](crate::Error::TableNotFound) when the
    /// table vanished since it was listed.
    async fn fetch_create_statement(&self, table_name: &str) -> Result<String>;

    /// Execute a statement, returning the number of affected rows
    ///
    /// Fails with [`Error::ExecutionError`](crate::Error::ExecutionError).
    async fn execute(&self, statement: &str) -> Result<u64>;
}

