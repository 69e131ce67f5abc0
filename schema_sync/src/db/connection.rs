//! Database connection handling
//!
//! This module provides functionality to establish and manage database connections.

use async_trait::async_trait;
use sqlx::{mysql::MySqlPoolOptions, mysql::MySqlRow, ColumnIndex, Executor, MySqlPool, Row};

use crate::config::DatabaseConfig;
use crate::db::catalog::Catalog;
use crate::error::{Error, Result};
use crate::utils::naming::quote_identifier;

/// SQLSTATE reported by MySQL for an unknown table
const NO_SUCH_TABLE: &str = "42S02";

/// A connection pool to one MySQL database
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: MySqlPool,
}

impl DatabaseConnection {
    /// Create a new database connection from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool_size = config.pool_size.unwrap_or(1);
        let timeout_seconds = config.timeout_seconds.unwrap_or(30);

        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| Error::ConnectionError(format!("failed to open database: {}", e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Catalog for DatabaseConnection {
    async fn list_table_names(&self) -> Result<Vec<String>> {
        // `SHOW` statements go over the text protocol; not every server
        // version accepts them as prepared statements.
        let rows = (&self.pool)
            .fetch_all("SHOW TABLE STATUS")
            .await
            .map_err(|e| Error::ConnectionError(format!("failed to list tables: {}", e)))?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in &rows {
            // Views show up with a `VIEW` comment and no engine.
            if text_column(row, "Comment")?.as_deref() == Some("VIEW") {
                continue;
            }
            if let Some(name) = text_column(row, "Name")? {
                tables.push(name);
            }
        }

        Ok(tables)
    }

    async fn fetch_create_statement(&self, table_name: &str) -> Result<String> {
        let sql = format!("SHOW CREATE TABLE {}", quote_identifier(table_name));

        let row = (&self.pool)
            .fetch_optional(sql.as_str())
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some(NO_SUCH_TABLE) => {
                    Error::TableNotFound(table_name.to_string())
                }
                _ => Error::ConnectionError(format!(
                    "failed to fetch definition of `{}`: {}",
                    table_name, e
                )),
            })?
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))?;

        text_column(&row, 1usize)?.ok_or_else(|| Error::TableNotFound(table_name.to_string()))
    }

    async fn execute(&self, statement: &str) -> Result<u64> {
        let result = Executor::execute(&self.pool, statement)
            .await
            .map_err(|e| Error::ExecutionError {
                statement: statement.to_string(),
                message: e.to_string(),
            })?;

        Ok(result.rows_affected())
    }
}

/// Read a column as text, treating NULL and the empty string alike
///
/// `SHOW` output is binary-collated on some server versions, so raw bytes are
/// accepted as a fallback.
fn text_column<I>(row: &MySqlRow, index: I) -> Result<Option<String>>
where
    I: ColumnIndex<MySqlRow> + Copy + std::fmt::Debug,
{
    let value = match row.try_get::<Option<String>, _>(index) {
        Ok(value) => value,
        Err(_) => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .map_err(|e| {
                Error::ConnectionError(format!("failed to decode column {:?}: {}", index, e))
            })?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
    };

    Ok(value.filter(|v| !v.is_empty()))
}
