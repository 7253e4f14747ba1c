//! Turns a declared schema and an existing schema into an ordered plan of
//! DDL statements.
//!
//! Statements are generated in two passes. The first pass walks every
//! declared table and emits table creation, column and index statements.
//! The second pass emits foreign key statements, so every referenced table
//! and column already exists when a constraint is added.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use crate::declaration::{ColumnDeclaration, Schema, TableDeclaration};
use crate::dialect::{DdlDialect, MySqlDialect};
use crate::difference::{columns_differ, foreign_keys_differ, indices_differ, Difference};
use crate::error::{Result, SchemaError};
use crate::sanitize::safe_parameter;

/// What a [`Statement`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    CreateTable,
    AddColumn,
    ChangeColumn,
    DropColumn,
    AddIndex,
    DropIndex,
    AddForeignKey,
    DropForeignKey,
}

/// A single DDL statement, with the reason for it when it replaces
/// something that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// What the statement does.
    pub kind: StatementKind,
    /// The SQL text.
    pub sql: String,
    /// The difference that caused the statement, if any.
    pub description: Option<Difference>,
}

/// An ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    statements: Vec<Statement>,
}

impl Plan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements in execution order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Consumes the plan, returning its statements.
    #[must_use]
    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    /// The SQL text of every statement, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<&str> {
        self.statements.iter().map(|s| s.sql.as_str()).collect()
    }

    /// Human-readable descriptions keyed by statement position. Only
    /// statements caused by a difference have one.
    #[must_use]
    pub fn descriptions(&self) -> BTreeMap<usize, String> {
        self.statements
            .iter()
            .enumerate()
            .filter_map(|(position, statement)| {
                statement
                    .description
                    .as_ref()
                    .map(|description| (position, description.to_string()))
            })
            .collect()
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether there is nothing to execute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Appends another plan's statements after this one's.
    pub fn append(&mut self, other: Plan) {
        self.statements.extend(other.statements);
    }

    fn push(&mut self, kind: StatementKind, sql: String, description: Option<Difference>) {
        debug!(kind = ?kind, sql = %sql, "Planned statement");
        self.statements.push(Statement {
            kind,
            sql,
            description,
        });
    }
}

impl FromIterator<Statement> for Plan {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Plan {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

/// Generates the statements that bring an existing schema in line with a
/// declared one.
#[derive(Debug, Clone, Default)]
pub struct QueryFactory<D = MySqlDialect> {
    dialect: D,
}

impl QueryFactory<MySqlDialect> {
    /// Creates a factory emitting MySQL DDL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dialect: MySqlDialect::new(),
        }
    }
}

impl<D: DdlDialect> QueryFactory<D> {
    /// Creates a factory for the given dialect.
    pub fn with_dialect(dialect: D) -> Self {
        Self { dialect }
    }

    /// Returns the dialect used for rendering.
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Builds the plan for `declared` against `existing`.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared table has no columns, if an
    /// AUTO_INCREMENT column is nullable or not the primary key, if an
    /// index has no columns, or if a foreign key misses its reference.
    pub fn queries(&self, declared: &Schema, existing: &Schema) -> Result<Plan> {
        let mut plan = Plan::new();

        for table in declared.tables() {
            let existing_table = existing.table(table.name());
            if existing_table.is_none() {
                let first = table
                    .columns()
                    .first()
                    .ok_or_else(|| SchemaError::EmptyTable(table.name().to_string()))?;
                plan.push(
                    StatementKind::CreateTable,
                    self.dialect.create_table(table.name(), first)?,
                    None,
                );
            }
            self.column_queries(table, existing_table, &mut plan)?;
            self.index_queries(table, existing_table, &mut plan)?;
        }

        // Foreign keys are matched by column name across the whole existing
        // schema; a later table wins over an earlier one.
        let existing_columns: HashMap<String, &ColumnDeclaration> = existing
            .all_columns()
            .map(|column| (column.name.to_lowercase(), column))
            .collect();

        for table in declared.tables() {
            for column in table.columns() {
                let existing_column = existing_columns.get(&column.name.to_lowercase()).copied();
                self.foreign_key_queries(table.name(), column, existing_column, &mut plan)?;
            }
        }

        info!(
            dialect = self.dialect.name(),
            tables = declared.len(),
            statements = plan.len(),
            "Built schema plan"
        );
        Ok(plan)
    }

    fn column_queries(
        &self,
        table: &TableDeclaration,
        existing_table: Option<&TableDeclaration>,
        plan: &mut Plan,
    ) -> Result<()> {
        // A freshly created table already holds its first column.
        let skip_first = existing_table.is_none_or(|t| t.columns().is_empty());

        for (position, column) in table.columns().iter().enumerate() {
            if position == 0 && skip_first {
                continue;
            }
            let existing_column = existing_table.and_then(|t| t.column(&column.name));

            match existing_column {
                Some(_) if column.drop => plan.push(
                    StatementKind::DropColumn,
                    self.dialect.drop_column(table.name(), &column.name),
                    None,
                ),
                Some(existing_column) => {
                    if let Some(difference) = columns_differ(column, existing_column) {
                        plan.push(
                            StatementKind::ChangeColumn,
                            self.dialect.change_column(table.name(), column)?,
                            Some(difference),
                        );
                    }
                }
                None if column.drop => {}
                None => plan.push(
                    StatementKind::AddColumn,
                    self.dialect.add_column(table.name(), column)?,
                    None,
                ),
            }
        }
        Ok(())
    }

    fn index_queries(
        &self,
        table: &TableDeclaration,
        existing_table: Option<&TableDeclaration>,
        plan: &mut Plan,
    ) -> Result<()> {
        for index in table.indices() {
            let existing_index =
                existing_table.and_then(|t| t.index(&safe_parameter(&index.name)));

            let Some(existing_index) = existing_index else {
                if !index.drop {
                    plan.push(
                        StatementKind::AddIndex,
                        self.dialect.add_index(table.name(), index)?,
                        None,
                    );
                }
                continue;
            };

            let difference = indices_differ(index, existing_index);
            if difference.is_none() && !index.drop {
                continue;
            }
            plan.push(
                StatementKind::DropIndex,
                self.dialect.drop_index(table.name(), &index.name),
                difference,
            );
            if !index.drop {
                plan.push(
                    StatementKind::AddIndex,
                    self.dialect.add_index(table.name(), index)?,
                    None,
                );
            }
        }
        Ok(())
    }

    fn foreign_key_queries(
        &self,
        table: &str,
        column: &ColumnDeclaration,
        existing_column: Option<&ColumnDeclaration>,
        plan: &mut Plan,
    ) -> Result<()> {
        let Some(foreign_key) = &column.foreign_key else {
            return Ok(());
        };
        if foreign_key.reference_table.is_none() || foreign_key.reference_column.is_none() {
            return Err(SchemaError::MissingReference(column.name.clone()));
        }

        let existing_key = existing_column.and_then(|c| c.foreign_key.as_ref());
        let difference = existing_key.and_then(|existing| foreign_keys_differ(foreign_key, existing));

        // The existing key may belong to another table, so the declared
        // name is the one dropped from this table.
        if existing_key.is_some() && (difference.is_some() || foreign_key.drop) {
            plan.push(
                StatementKind::DropForeignKey,
                self.dialect.drop_foreign_key(table, &foreign_key.name),
                difference.clone(),
            );
        }
        if (existing_key.is_none() || difference.is_some()) && !foreign_key.drop {
            plan.push(
                StatementKind::AddForeignKey,
                self.dialect.add_foreign_key(table, &column.name, foreign_key)?,
                None,
            );
        }
        Ok(())
    }
}
