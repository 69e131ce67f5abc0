//! SQL executor
//!
//! This module applies DDL statements to the target database, one at a time.

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::db::catalog::Catalog;
use crate::error::Result;
use crate::schema::diff::{FieldAction, SyncPlan};
use crate::schema::generator::MigrationGenerator;

/// Result of one successfully executed statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub statement: String,
    pub elapsed: Duration,
    pub rows_affected: u64,
}

impl ExecutionOutcome {
    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Receives each outcome as soon as its statement completes
pub trait Reporter: Send {
    fn report(&mut self, outcome: &ExecutionOutcome);

    /// Called for every column that will be dropped and re-added, before
    /// any statement runs
    fn destructive_change(&mut self, _action: &FieldAction) {}
}

impl Reporter for Vec<ExecutionOutcome> {
    fn report(&mut self, outcome: &ExecutionOutcome) {
        self.push(outcome.clone());
    }
}

/// SQL executor for running statements against the target
pub struct SqlExecutor<'a, C> {
    catalog: &'a C,
}

impl<'a, C: Catalog> SqlExecutor<'a, C> {
    /// Create a new SQL executor
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Execute a single SQL statement
    pub async fn execute(&self, sql: &str) -> Result<ExecutionOutcome> {
        let start = Instant::now();
        let rows_affected = self.catalog.execute(sql).await?;

        Ok(ExecutionOutcome {
            statement: sql.to_string(),
            elapsed: start.elapsed(),
            rows_affected,
        })
    }

    /// Execute multiple SQL statements in order
    ///
    /// Stops at the first failure. Statements that already ran are not
    /// rolled back.
    pub async fn execute_batch(
        &self,
        statements: &[String],
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<ExecutionOutcome>> {
        let mut outcomes = Vec::with_capacity(statements.len());

        for statement in statements {
            let outcome = self.execute(statement).await.map_err(|e| {
                tracing::error!(
                    applied = outcomes.len(),
                    remaining = statements.len() - outcomes.len(),
                    "Aborting sync after failed statement"
                );
                e
            })?;
            reporter.report(&outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Apply every action of a plan in the fixed safe order
    pub async fn apply_plan(
        &self,
        plan: &SyncPlan,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<ExecutionOutcome>> {
        let statements = MigrationGenerator::new().generate_migration_sql(plan);
        self.execute_batch(&statements, reporter).await
    }
}
