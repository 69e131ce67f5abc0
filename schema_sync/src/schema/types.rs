//! Type definitions for database schema objects

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::naming::IDENTIFIER_QUOTE;

/// Leading quoted identifier of a column line, e.g. `` `id` int NOT NULL ``
static FIELD_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^`(\w+)").expect("valid regex"));

/// Column name -> trimmed column definition line
pub type FieldMap = IndexMap<String, String>;

/// A table as reported by `SHOW CREATE TABLE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    /// Verbatim definition statement, replayed as-is to create the table
    pub raw_statement: String,
    pub fields: FieldMap,
}

impl TableDefinition {
    /// Create a definition from a raw `CREATE TABLE` statement
    pub fn new(name: &str, raw_statement: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_statement: raw_statement.to_string(),
            fields: parse_fields(raw_statement),
        }
    }

    /// A name-only definition for a table that has not been fetched
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_statement: String::new(),
            fields: FieldMap::new(),
        }
    }

    /// Whether the definition was fetched from the catalog
    pub fn is_loaded(&self) -> bool {
        !self.raw_statement.is_empty()
    }
}

/// Extract the column lines of a `CREATE TABLE` statement
///
/// The first line (`CREATE TABLE ... (`) and the last line (`) ENGINE=...`)
/// are skipped. Only lines starting with a quoted identifier are columns;
/// key, index and constraint clauses are ignored. A statement shorter than
/// three lines has no columns.
pub fn parse_fields(raw_statement: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    let lines: Vec<&str> = raw_statement.trim().lines().collect();
    if lines.len() < 3 {
        return fields;
    }

    for line in &lines[1..lines.len() - 1] {
        let line = line.trim();
        let line = line.strip_suffix(',').unwrap_or(line);
        if !line.starts_with(IDENTIFIER_QUOTE) {
            continue;
        }
        if let Some(name) = FIELD_NAME.captures(line).and_then(|c| c.get(1)) {
            fields.insert(name.as_str().to_string(), line.to_string());
        }
    }

    fields
}
