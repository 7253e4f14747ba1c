//! Best-effort statement execution.
//!
//! Every statement is attempted in order, without a transaction. A failing
//! statement is recorded with its error text and does not stop the rest.

use serde::Serialize;
use tracing::{info, warn};

use bytes_schema::Statement;

use crate::db::Database;

/// Result of running one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum Outcome {
    /// The statement succeeded.
    Ok,
    /// The statement failed with this error text.
    Failed(String),
}

/// A statement together with what happened when it ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    /// The statement that was run.
    pub statement: Statement,
    /// How it went.
    pub outcome: Outcome,
}

impl Execution {
    /// Whether the statement succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome == Outcome::Ok
    }
}

/// Runs statements one by one against a database.
pub struct StatementRunner<'a, D: Database> {
    database: &'a D,
}

impl<'a, D: Database> StatementRunner<'a, D> {
    /// Creates a runner for `database`.
    pub fn new(database: &'a D) -> Self {
        Self { database }
    }

    /// Runs every statement, returning one [`Execution`] per statement in
    /// the same order.
    pub async fn run(&self, statements: &[Statement]) -> Vec<Execution> {
        let mut executions = Vec::with_capacity(statements.len());

        for statement in statements {
            let outcome = match self.database.execute(&statement.sql).await {
                Ok(()) => {
                    info!(sql = %statement.sql, "Statement executed");
                    Outcome::Ok
                }
                Err(e) => {
                    warn!(sql = %statement.sql, error = %e, "Statement failed");
                    Outcome::Failed(e.to_string())
                }
            };
            executions.push(Execution {
                statement: statement.clone(),
                outcome,
            });
        }

        executions
    }
}
