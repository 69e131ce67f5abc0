//! Migration scripts
//!
//! This module writes the planned statements to a `.sql` file so a plan can be
//! reviewed or applied by hand.

use chrono::Utc;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Write statements to `<directory>/<timestamp>_schema_sync.sql`
pub fn write_migration_script(directory: &str, statements: &[String]) -> Result<PathBuf> {
    fs::create_dir_all(directory)?;

    let filename = format!("{}_schema_sync.sql", generate_migration_id());
    let filepath = Path::new(directory).join(filename);

    let mut file = File::create(&filepath)?;
    for statement in statements {
        file.write_all(statement.trim_end().trim_end_matches(';').as_bytes())?;
        file.write_all(b";\n\n")?;
    }

    tracing::info!(path = %filepath.display(), statements = statements.len(), "Wrote migration script");
    Ok(filepath)
}

/// Generate a migration ID based on timestamp
fn generate_migration_id() -> String {
    Utc::now().format("%Y%m%d%H%M%S").to_string()
}
