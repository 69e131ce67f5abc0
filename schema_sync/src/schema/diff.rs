//! Schema difference calculator
//!
//! This module compares a source and a target database and calculates the
//! actions that bring the target in line with the source.

use serde::Serialize;

use crate::db::catalog::Catalog;
use crate::error::{Error, Result};
use crate::schema::snapshot::SchemaSnapshot;
use crate::schema::types::TableDefinition;

/// What to do with one column of a target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FieldActionKind {
    /// Add the column using the source fragment
    Add { fragment: String },
    /// Drop the column
    Drop,
    /// Drop the column, then re-add it using the source fragment.
    /// Existing data in the column is lost.
    Change { fragment: String },
}

/// A column-level action on a table present on both sides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAction {
    /// Target table name
    pub table: String,
    pub field_name: String,
    pub kind: FieldActionKind,
}

/// A table left out of the comparison because its definition could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTable {
    pub table: String,
    pub reason: String,
}

/// Changes needed to synchronize the target schema with the source
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncPlan {
    /// Source definitions of tables missing from the target
    pub tables_to_create: Vec<TableDefinition>,
    /// Target definitions of tables missing from the source
    pub tables_to_drop: Vec<TableDefinition>,
    pub field_actions: Vec<FieldAction>,
    /// Tables that could not be introspected on either side
    pub skipped: Vec<SkippedTable>,
}

impl SyncPlan {
    /// Compare two snapshots and classify every difference
    ///
    /// Tables that vanished before they could be fetched are recorded in
    /// [`SyncPlan::skipped`] and the comparison carries on with the rest.
    /// Connection failures abort the comparison.
    pub async fn generate<S: Catalog, T: Catalog>(
        source: &mut SchemaSnapshot<S>,
        target: &mut SchemaSnapshot<T>,
    ) -> Result<Self> {
        let mut plan = SyncPlan::default();

        let source_tables = source.tables().to_vec();
        for name in &source_tables {
            let source_table = match source.table(name, true).await {
                Ok(table) => table,
                Err(e) => {
                    plan.skip(name, e)?;
                    continue;
                }
            };

            // Only tables the target lists are fetched from it
            let target_table = match target.table(name, target.contains(name)).await {
                Ok(table) => table,
                Err(e) => {
                    plan.skip(name, e)?;
                    continue;
                }
            };

            // Creation replays the source statement
            if !target_table.is_loaded() {
                plan.tables_to_create.push(source_table);
                continue;
            }

            plan.field_actions
                .extend(compare_tables(&source_table, &target_table));
        }

        for name in target.tables().to_vec() {
            if source.contains(&name) {
                continue;
            }
            match target.table(&name, true).await {
                Ok(table) => plan.tables_to_drop.push(table),
                Err(e) => plan.skip(&name, e)?,
            }
        }

        Ok(plan)
    }

    /// Record a table that failed introspection, propagating anything fatal
    fn skip(&mut self, table: &str, error: Error) -> Result<()> {
        if !error.is_recoverable() {
            return Err(error);
        }
        tracing::warn!(table = table, error = %error, "Skipping table that could not be introspected");
        self.skipped.push(SkippedTable {
            table: table.to_string(),
            reason: error.to_string(),
        });
        Ok(())
    }

    /// Check if the plan is empty (no changes needed)
    pub fn is_empty(&self) -> bool {
        self.tables_to_create.is_empty()
            && self.tables_to_drop.is_empty()
            && self.field_actions.is_empty()
    }

    /// Field actions that destroy column data
    pub fn destructive_changes(&self) -> impl Iterator<Item = &FieldAction> {
        self.field_actions
            .iter()
            .filter(|action| matches!(action.kind, FieldActionKind::Change { .. }))
    }
}

/// Compare two definitions of the same table
///
/// Identical raw statements short-circuit first, then identical field maps
/// (which absorbs engine option, comment and key differences). Only then are
/// the columns compared one by one.
pub fn compare_tables(source: &TableDefinition, target: &TableDefinition) -> Vec<FieldAction> {
    if source.raw_statement == target.raw_statement {
        return Vec::new();
    }
    if source.fields == target.fields {
        return Vec::new();
    }
    compare_fields(source, target)
}

/// Column-level comparison; fragments are compared as exact strings
///
/// A renamed column shows up as a drop of the old name and an add of the new one.
pub fn compare_fields(source: &TableDefinition, target: &TableDefinition) -> Vec<FieldAction> {
    let mut actions = Vec::new();

    for (field_name, fragment) in &source.fields {
        let kind = match target.fields.get(field_name) {
            None => FieldActionKind::Add {
                fragment: fragment.clone(),
            },
            Some(existing) if existing != fragment => FieldActionKind::Change {
                fragment: fragment.clone(),
            },
            Some(_) => continue,
        };
        actions.push(FieldAction {
            table: target.name.clone(),
            field_name: field_name.clone(),
            kind,
        });
    }

    for field_name in target.fields.keys() {
        if !source.fields.contains_key(field_name) {
            actions.push(FieldAction {
                table: target.name.clone(),
                field_name: field_name.clone(),
                kind: FieldActionKind::Drop,
            });
        }
    }

    actions
}
