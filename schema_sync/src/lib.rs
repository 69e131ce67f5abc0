//! SchemaSync: brings the schema of a target MySQL database in line with a source database
//!
//! SchemaSync reads the `CREATE TABLE` statements of both databases, works out
//! which tables to create or drop and which columns to add, drop or change,
//! and applies those statements to the target one at a time.
//!
//! A changed column is dropped and re-added, so **the data in that column is
//! lost**. Nothing is wrapped in a transaction and nothing is rolled back when
//! a statement fails.

pub mod config;
pub mod db;
pub mod error;
pub mod schema;
pub mod utils;

use std::path::PathBuf;

// Re-export main types for easier access
pub use config::{Config, SyncConfig};
pub use db::catalog::Catalog;
pub use db::connection::DatabaseConnection;
pub use db::executor::{ExecutionOutcome, Reporter, SqlExecutor};
pub use error::{Error, Result};
pub use schema::diff::{FieldAction, FieldActionKind, SyncPlan};
pub use schema::generator::MigrationGenerator;
pub use schema::snapshot::SchemaSnapshot;
pub use schema::types::TableDefinition;

/// Initialize SchemaSync with the specified configuration file
pub async fn init(config_path: &str) -> Result<SchemaSyncClient<DatabaseConnection>> {
    let config = config::load_from_file(config_path)?;
    SchemaSyncClient::new(&config).await
}

/// How a sync run ended
#[derive(Debug)]
pub enum SyncStatus {
    /// The target already matches the source; nothing was executed
    AlreadySynced,
    /// Statements were planned but not executed
    DryRun { statements: Vec<String> },
    /// Statements were executed against the target
    Applied { outcomes: Vec<ExecutionOutcome> },
}

/// Everything a sync run produced
#[derive(Debug)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub plan: SyncPlan,
    /// Where the statements were written, when a script directory is configured
    pub script: Option<PathBuf>,
}

/// The main client for one synchronization run
pub struct SchemaSyncClient<C> {
    config: SyncConfig,
    source: SchemaSnapshot<C>,
    target: SchemaSnapshot<C>,
}

impl SchemaSyncClient<DatabaseConnection> {
    /// Connect to both databases from configuration
    pub async fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let (source, target) = tokio::try_join!(
            DatabaseConnection::connect(&config.source),
            DatabaseConnection::connect(&config.target),
        )?;

        Self::from_catalogs(source, target, config.sync.clone()).await
    }
}

impl<C: Catalog> SchemaSyncClient<C> {
    /// Snapshot the source and target catalogs
    pub async fn from_catalogs(source: C, target: C, config: SyncConfig) -> Result<Self> {
        let (source, target) =
            tokio::try_join!(SchemaSnapshot::load(source), SchemaSnapshot::load(target))?;

        tracing::info!(
            source_tables = source.tables().len(),
            target_tables = target.tables().len(),
            "Loaded schemas"
        );

        Ok(Self {
            config,
            source,
            target,
        })
    }

    /// Compare the source schema against the target schema
    pub async fn generate_plan(&mut self) -> Result<SyncPlan> {
        SyncPlan::generate(&mut self.source, &mut self.target).await
    }

    /// Generate the ordered DDL statements for a plan
    pub fn generate_migrations(&self, plan: &SyncPlan) -> Vec<String> {
        MigrationGenerator::new().generate_migration_sql(plan)
    }

    /// Apply statements to the target database
    pub async fn apply_migrations(
        &self,
        migrations: &[String],
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<ExecutionOutcome>> {
        SqlExecutor::new(self.target.catalog())
            .execute_batch(migrations, reporter)
            .await
    }

    /// Complete workflow: compare, then export and apply the statements
    pub async fn sync_database(&mut self, reporter: &mut dyn Reporter) -> Result<SyncReport> {
        let plan = self.generate_plan().await?;

        if plan.is_empty() {
            tracing::info!("Target schema is already in sync with the source");
            return Ok(SyncReport {
                status: SyncStatus::AlreadySynced,
                plan,
                script: None,
            });
        }

        for action in plan.destructive_changes() {
            reporter.destructive_change(action);
            tracing::warn!(
                table = %action.table,
                field = %action.field_name,
                "Column will be dropped and re-added; its data will be lost"
            );
        }

        let migrations = self.generate_migrations(&plan);

        let script = match &self.config.script_directory {
            Some(directory) => Some(db::migrations::write_migration_script(
                directory,
                &migrations,
            )?),
            None => None,
        };

        if self.config.dry_run {
            for (i, migration) in migrations.iter().enumerate() {
                tracing::info!(
                    migration_number = i + 1,
                    sql = %utils::flatten_statement(migration),
                    "Migration SQL (dry run)"
                );
            }
            return Ok(SyncReport {
                status: SyncStatus::DryRun {
                    statements: migrations,
                },
                plan,
                script,
            });
        }

        let outcomes = self.apply_migrations(&migrations, reporter).await?;

        Ok(SyncReport {
            status: SyncStatus::Applied { outcomes },
            plan,
            script,
        })
    }
}
