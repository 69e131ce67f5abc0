//! Migration generator
//!
//! This module renders a sync plan into the ordered list of DDL statements.

use crate::schema::diff::{FieldAction, FieldActionKind, SyncPlan};
use crate::schema::types::TableDefinition;
use crate::utils::naming::quote_identifier;

/// Migration SQL generator
#[derive(Debug, Default, Clone, Copy)]
pub struct MigrationGenerator;

impl MigrationGenerator {
    /// Create a new migration generator
    pub fn new() -> Self {
        Self
    }

    /// Generate migration SQL from a sync plan
    ///
    /// Table creations come first, then table drops, then column actions in
    /// plan order. A changed column is dropped and immediately re-added.
    pub fn generate_migration_sql(&self, plan: &SyncPlan) -> Vec<String> {
        let mut migrations = Vec::new();

        for table in &plan.tables_to_create {
            migrations.push(self.generate_create_table_sql(table));
        }

        for table in &plan.tables_to_drop {
            migrations.push(self.generate_drop_table_sql(&table.name));
        }

        for action in &plan.field_actions {
            migrations.extend(self.generate_field_action_sql(action));
        }

        migrations
    }

    /// The source statement, replayed verbatim
    fn generate_create_table_sql(&self, table: &TableDefinition) -> String {
        table.raw_statement.clone()
    }

    fn generate_drop_table_sql(&self, table_name: &str) -> String {
        format!("DROP TABLE {}", quote_identifier(table_name))
    }

    fn generate_field_action_sql(&self, action: &FieldAction) -> Vec<String> {
        match &action.kind {
            FieldActionKind::Add { fragment } => {
                vec![self.generate_add_column_sql(&action.table, fragment)]
            }
            FieldActionKind::Drop => {
                vec![self.generate_drop_column_sql(&action.table, &action.field_name)]
            }
            FieldActionKind::Change { fragment } => vec![
                self.generate_drop_column_sql(&action.table, &action.field_name),
                self.generate_add_column_sql(&action.table, fragment),
            ],
        }
    }

    fn generate_add_column_sql(&self, table_name: &str, fragment: &str) -> String {
        format!("ALTER TABLE {} ADD {}", quote_identifier(table_name), fragment)
    }

    fn generate_drop_column_sql(&self, table_name: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP {}",
            quote_identifier(table_name),
            quote_identifier(column_name)
        )
    }
}
