//! Schema module for SchemaSync
//!
//! This module handles table parsing, schema snapshots, comparison and
//! statement generation.

pub mod diff;
pub mod generator;
pub mod snapshot;
pub mod types;

// Re-export key types
pub use diff::{FieldAction, FieldActionKind, SkippedTable, SyncPlan};
pub use generator::MigrationGenerator;
pub use snapshot::SchemaSnapshot;
pub use types::{parse_fields, FieldMap, TableDefinition};
