//! DDL rendering.
//!
//! The [`DdlDialect`] trait renders individual statements from
//! declarations. Every identifier goes through
//! [`safe_parameter`](crate::safe_parameter) before it is quoted.

use crate::declaration::{ColumnDeclaration, ForeignKeyDeclaration, IndexDeclaration};
use crate::error::{Result, SchemaError};
use crate::sanitize::{add_slashes, is_numeric, safe_parameter};

/// Dialect-specific DDL generation.
pub trait DdlDialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Options appended to every `CREATE TABLE`.
    fn table_options(&self) -> &'static str;

    /// Sanitizes and quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", safe_parameter(name))
    }

    /// Renders a full column definition.
    ///
    /// Fails if the column is AUTO_INCREMENT and nullable, or AUTO_INCREMENT
    /// without being the primary key.
    fn column_definition(&self, column: &ColumnDeclaration) -> Result<String> {
        if column.auto_increment && column.nullable {
            return Err(SchemaError::AutoIncrementNullable(column.name.clone()));
        }
        if column.auto_increment && !column.primary_key {
            return Err(SchemaError::AutoIncrementWithoutPrimaryKey(column.name.clone()));
        }

        let arguments: Vec<String> = column
            .arguments
            .iter()
            .map(|argument| {
                let argument = safe_parameter(argument);
                if is_numeric(&argument) {
                    argument
                } else {
                    format!("\"{argument}\"")
                }
            })
            .collect();

        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            safe_parameter(column.data_type.as_sql())
        );
        if !arguments.is_empty() {
            sql.push('(');
            sql.push_str(&arguments.join(", "));
            sql.push(')');
        }
        if column.unsigned {
            sql.push_str(" UNSIGNED");
        }
        sql.push_str(if column.nullable { " NULL" } else { " NOT NULL" });

        if column.primary_key {
            if column.auto_increment {
                sql.push_str(" AUTO_INCREMENT");
            }
            sql.push_str(" PRIMARY KEY");
        } else if column.unique {
            sql.push_str(" UNIQUE");
        }

        if let Some(ref default) = column.default {
            sql.push_str(&format!(" DEFAULT \"{}\"", add_slashes(default)));
        }

        Ok(sql)
    }

    /// Renders `` `name` (`col`, ...) `` for an index. Fails if the index has
    /// no columns.
    fn index_definition(&self, index: &IndexDeclaration) -> Result<String> {
        if index.columns.is_empty() {
            return Err(SchemaError::IndexWithoutColumns(index.name.clone()));
        }
        let columns: Vec<String> = index
            .columns
            .iter()
            .map(|column| self.quote_identifier(column))
            .collect();
        Ok(format!(
            "{} ({})",
            self.quote_identifier(&index.name),
            columns.join(", ")
        ))
    }

    /// `CREATE TABLE` with a single initial column.
    fn create_table(&self, table: &str, first_column: &ColumnDeclaration) -> Result<String> {
        Ok(format!(
            "CREATE TABLE {} ({}) {}",
            self.quote_identifier(table),
            self.column_definition(first_column)?,
            self.table_options()
        ))
    }

    /// `ALTER TABLE ... ADD COLUMN`.
    fn add_column(&self, table: &str, column: &ColumnDeclaration) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(table),
            self.column_definition(column)?
        ))
    }

    /// `ALTER TABLE ... CHANGE COLUMN` with the full new definition.
    fn change_column(&self, table: &str, column: &ColumnDeclaration) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} CHANGE COLUMN {} {}",
            self.quote_identifier(table),
            self.quote_identifier(&column.name),
            self.column_definition(column)?
        ))
    }

    /// `ALTER TABLE ... DROP COLUMN`.
    fn drop_column(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// `ALTER TABLE ... ADD [UNIQUE] INDEX`.
    fn add_index(&self, table: &str, index: &IndexDeclaration) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD {}INDEX {}",
            self.quote_identifier(table),
            if index.unique { "UNIQUE " } else { "" },
            self.index_definition(index)?
        ))
    }

    /// `ALTER TABLE ... DROP INDEX`.
    fn drop_index(&self, table: &str, index: &str) -> String {
        format!(
            "ALTER TABLE {} DROP INDEX {}",
            self.quote_identifier(table),
            self.quote_identifier(index)
        )
    }

    /// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY ... REFERENCES ...`.
    ///
    /// Fails if the key has no referenced table or column.
    fn add_foreign_key(
        &self,
        table: &str,
        column: &str,
        foreign_key: &ForeignKeyDeclaration,
    ) -> Result<String> {
        let (Some(reference_table), Some(reference_column)) =
            (&foreign_key.reference_table, &foreign_key.reference_column)
        else {
            return Err(SchemaError::MissingReference(column.to_string()));
        };
        Ok(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}) ON UPDATE {} ON DELETE {}",
            self.quote_identifier(table),
            self.quote_identifier(&foreign_key.name),
            self.quote_identifier(column),
            self.quote_identifier(reference_table),
            self.quote_identifier(reference_column),
            foreign_key.on_update.as_sql(),
            foreign_key.on_delete.as_sql()
        ))
    }

    /// `ALTER TABLE ... DROP FOREIGN KEY`.
    fn drop_foreign_key(&self, table: &str, name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP FOREIGN KEY {}",
            self.quote_identifier(table),
            self.quote_identifier(name)
        )
    }
}

/// MySQL / MariaDB with InnoDB tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DdlDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn table_options(&self) -> &'static str {
        "ENGINE=InnoDB CHARACTER SET utf8 COLLATE utf8_unicode_ci"
    }
}
