//! Schema snapshots
//!
//! The table list of one database plus lazily fetched table definitions.

use std::collections::{HashMap, HashSet};

use crate::db::catalog::Catalog;
use crate::error::{Error, Result};
use crate::schema::types::TableDefinition;

/// The tables of one database at the start of a run
pub struct SchemaSnapshot<C> {
    catalog: C,
    tables: Vec<String>,
    names: HashSet<String>,
    loaded: HashMap<String, TableDefinition>,
}

impl<C: Catalog> SchemaSnapshot<C> {
    /// List the tables of `catalog`
    ///
    /// Nothing can be compared without the table list, so a failure here is
    /// returned as is.
    pub async fn load(catalog: C) -> Result<Self> {
        let tables = catalog.list_table_names().await?;
        tracing::debug!(tables = tables.len(), "Loaded table list");

        Ok(Self {
            catalog,
            names: tables.iter().cloned().collect(),
            tables,
            loaded: HashMap::new(),
        })
    }

    /// Table names in catalog order
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Whether the database has a table with this name
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The catalog this snapshot reads from
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Get the definition of a table
    ///
    /// With `init_table` the definition is fetched and parsed once and then
    /// served from the snapshot. Without it only a name placeholder is
    /// returned and the catalog is not queried. A table that vanished since
    /// it was listed comes back as [`Error::IntrospectionError`]; connection
    /// failures are returned unchanged.
    pub async fn table(&mut self, name: &str, init_table: bool) -> Result<TableDefinition> {
        if !init_table {
            return Ok(self
                .loaded
                .get(name)
                .cloned()
                .unwrap_or_else(|| TableDefinition::placeholder(name)));
        }

        if let Some(table) = self.loaded.get(name) {
            return Ok(table.clone());
        }

        let raw_statement = self
            .catalog
            .fetch_create_statement(name)
            .await
            .map_err(|e| match e {
                e @ Error::TableNotFound(_) => Error::IntrospectionError {
                    table: name.to_string(),
                    reason: e.to_string(),
                },
                other => other,
            })?;

        let table = TableDefinition::new(name, &raw_statement);
        tracing::trace!(table = name, fields = table.fields.len(), "Parsed table definition");
        self.loaded.insert(name.to_string(), table.clone());

        Ok(table)
    }
}
