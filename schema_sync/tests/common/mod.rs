//! In-memory catalog used by the integration tests
//!
//! Understands exactly the DDL the generator emits: verbatim `CREATE TABLE`,
//! `DROP TABLE`, `ALTER TABLE .. ADD` and `ALTER TABLE .. DROP`.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use schema_sync::schema::parse_fields;
use schema_sync::{Catalog, Error, Result};

#[derive(Debug, Clone)]
struct MemoryTable {
    name: String,
    raw: String,
}

#[derive(Debug, Default)]
struct State {
    tables: Vec<MemoryTable>,
    executed: Vec<String>,
    fetches: Vec<String>,
    vanished: HashSet<String>,
    failing_statement: Option<String>,
    listing_fails: bool,
    connection_lost: bool,
}

/// Cloneable handle; clones share the same database
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<State>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from `(name, create statement)` pairs
    pub fn with_tables(tables: &[(&str, &str)]) -> Self {
        let catalog = Self::new();
        for (name, raw) in tables {
            catalog.put(name, raw);
        }
        catalog
    }

    pub fn put(&self, name: &str, raw: &str) {
        let mut state = self.state.lock().unwrap();
        state.tables.retain(|t| t.name != name);
        state.tables.push(MemoryTable {
            name: name.to_string(),
            raw: raw.to_string(),
        });
    }

    /// Listed, but `SHOW CREATE TABLE` reports it missing
    pub fn vanish(&self, name: &str) {
        self.state.lock().unwrap().vanished.insert(name.to_string());
    }

    /// Fail any statement containing `needle`
    pub fn fail_statements_containing(&self, needle: &str) {
        self.state.lock().unwrap().failing_statement = Some(needle.to_string());
    }

    /// Keep listing tables, then fail every definition fetch as if the
    /// server went away
    pub fn lose_connection(&self) {
        self.state.lock().unwrap().connection_lost = true;
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().listing_fails = true;
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.state.lock().unwrap().fetches.clone()
    }

    pub fn table_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn raw(&self, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.raw.clone())
    }

    fn apply(state: &mut State, statement: &str) -> std::result::Result<u64, String> {
        if statement.starts_with("CREATE TABLE `") {
            let name = quoted_name(&statement["CREATE TABLE ".len()..])
                .ok_or_else(|| "bad create".to_string())?;
            if state.tables.iter().any(|t| t.name == name) {
                return Err(format!("Table '{}' already exists", name));
            }
            state.tables.push(MemoryTable {
                name,
                raw: statement.to_string(),
            });
            return Ok(0);
        }

        if let Some(rest) = statement.strip_prefix("DROP TABLE ") {
            let name = quoted_name(rest).ok_or_else(|| "bad drop".to_string())?;
            let before = state.tables.len();
            state.tables.retain(|t| t.name != name);
            if state.tables.len() == before {
                return Err(format!("Unknown table '{}'", name));
            }
            return Ok(0);
        }

        if let Some(rest) = statement.strip_prefix("ALTER TABLE ") {
            let name = quoted_name(rest).ok_or_else(|| "bad alter".to_string())?;
            let clause = &rest[name.len() + 3..];
            let table = state
                .tables
                .iter_mut()
                .find(|t| t.name == name)
                .ok_or_else(|| format!("Unknown table '{}'", name))?;

            let mut lines: Vec<String> = body_lines(&table.raw);
            if let Some(fragment) = clause.strip_prefix("ADD ") {
                let column = quoted_name(fragment).ok_or_else(|| "bad column".to_string())?;
                if parse_fields(&table.raw).contains_key(&column) {
                    return Err(format!("Duplicate column name '{}'", column));
                }
                let position = lines
                    .iter()
                    .position(|l| !l.starts_with('`'))
                    .unwrap_or(lines.len());
                lines.insert(position, fragment.to_string());
            } else if let Some(column) = clause.strip_prefix("DROP ") {
                let column = quoted_name(column).ok_or_else(|| "bad column".to_string())?;
                let prefix = format!("`{}`", column);
                let before = lines.len();
                lines.retain(|l| !l.starts_with(&prefix));
                if lines.len() == before {
                    return Err(format!("Can't DROP '{}'; check that column exists", column));
                }
            } else {
                return Err(format!("unsupported alter: {}", statement));
            }

            table.raw = render(&table.raw, &lines);
            return Ok(0);
        }

        Err(format!("unsupported statement: {}", statement))
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_table_names(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.listing_fails {
            return Err(Error::ConnectionError("connection refused".to_string()));
        }
        Ok(state.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn fetch_create_statement(&self, table_name: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.fetches.push(table_name.to_string());
        if state.connection_lost {
            return Err(Error::ConnectionError("server has gone away".to_string()));
        }
        if state.vanished.contains(table_name) {
            return Err(Error::TableNotFound(table_name.to_string()));
        }
        state
            .tables
            .iter()
            .find(|t| t.name == table_name)
            .map(|t| t.raw.clone())
            .ok_or_else(|| Error::TableNotFound(table_name.to_string()))
    }

    async fn execute(&self, statement: &str) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        if let Some(needle) = &state.failing_statement {
            if statement.contains(needle.as_str()) {
                return Err(Error::ExecutionError {
                    statement: statement.to_string(),
                    message: "simulated failure".to_string(),
                });
            }
        }
        let rows = Self::apply(&mut state, statement).map_err(|message| Error::ExecutionError {
            statement: statement.to_string(),
            message,
        })?;
        state.executed.push(statement.to_string());
        Ok(rows)
    }
}

/// Name inside the leading backticks of `s`
fn quoted_name(s: &str) -> Option<String> {
    let rest = s.strip_prefix('`')?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}

/// Trimmed definition lines between the header and the closing line
fn body_lines(raw: &str) -> Vec<String> {
    let lines: Vec<&str> = raw.trim().lines().collect();
    if lines.len() < 3 {
        return Vec::new();
    }
    lines[1..lines.len() - 1]
        .iter()
        .map(|l| l.trim().trim_end_matches(',').to_string())
        .collect()
}

fn render(raw: &str, body: &[String]) -> String {
    let lines: Vec<&str> = raw.trim().lines().collect();
    let header = lines.first().copied().unwrap_or("");
    let footer = if lines.len() >= 2 {
        lines[lines.len() - 1]
    } else {
        ") ENGINE=InnoDB"
    };
    let body: Vec<String> = body.iter().map(|l| format!("  {}", l)).collect();
    format!("{}\n{}\n{}", header, body.join(",\n"), footer)
}

/// A `SHOW CREATE TABLE`-shaped statement with a primary key on `id`
pub fn create_table(name: &str, columns: &[&str]) -> String {
    let mut body: Vec<String> = columns.iter().map(|c| format!("  {}", c)).collect();
    body.push("  PRIMARY KEY (`id`)".to_string());
    format!(
        "CREATE TABLE `{}` (\n{}\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        name,
        body.join(",\n")
    )
}
