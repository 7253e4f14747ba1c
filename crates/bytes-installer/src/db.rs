//! Live database boundary.
//!
//! The analyst and the statement runner only need a handful of metadata
//! queries plus the ability to run a statement. [`Database`] captures
//! exactly that, and [`MySqlDatabase`] implements it over a `sqlx` pool.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::Executor;
use tracing::debug;

use crate::error::Result;

/// One row of column metadata, as `SHOW COLUMNS` reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    /// Column name.
    pub name: String,
    /// Full column type, e.g. `int(10) unsigned` or `enum('a','b')`.
    pub column_type: String,
    /// `YES` or `NO`.
    pub nullable: String,
    /// `PRI`, `UNI`, `MUL` or empty.
    pub key: String,
    /// Default value, if any.
    pub default: Option<String>,
    /// Extra attributes, e.g. `auto_increment`.
    pub extra: String,
}

/// One row of index metadata: a single column of a single index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// Index name (`PRIMARY` for the primary key).
    pub name: String,
    /// Indexed column. Absent for functional key parts.
    pub column: Option<String>,
    /// Whether the index allows duplicates.
    pub non_unique: bool,
    /// 1-based position of the column within the index.
    pub sequence: i64,
}

/// One row of foreign key metadata: a single referencing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRow {
    /// Constraint name.
    pub name: String,
    /// Referencing column.
    pub column: String,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced column.
    pub referenced_column: String,
    /// `ON UPDATE` rule.
    pub update_rule: String,
    /// `ON DELETE` rule.
    pub delete_rule: String,
}

/// The queries the installer needs from a live database.
#[allow(async_fn_in_trait)]
pub trait Database {
    /// Executes a single statement.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Names of all base tables in the current database.
    async fn table_names(&self) -> Result<Vec<String>>;

    /// Column metadata for a table, in column order.
    async fn columns(&self, table: &str) -> Result<Vec<ColumnRow>>;

    /// Index metadata for a table.
    async fn indexes(&self, table: &str) -> Result<Vec<IndexRow>>;

    /// Foreign key metadata for a table.
    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyRow>>;
}

// ============================================================================
// MySQL
// ============================================================================

const TABLES_SQL: &str = "SELECT CAST(TABLE_NAME AS CHAR) \
     FROM INFORMATION_SCHEMA.TABLES \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME";

const COLUMNS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR), CAST(COLUMN_TYPE AS CHAR), \
     CAST(IS_NULLABLE AS CHAR), CAST(COLUMN_KEY AS CHAR), CAST(COLUMN_DEFAULT AS CHAR), \
     CAST(EXTRA AS CHAR) \
     FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

const INDEXES_SQL: &str = "SELECT CAST(INDEX_NAME AS CHAR), CAST(COLUMN_NAME AS CHAR), \
     CAST(NON_UNIQUE AS SIGNED), CAST(SEQ_IN_INDEX AS SIGNED) \
     FROM INFORMATION_SCHEMA.STATISTICS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
     ORDER BY INDEX_NAME, SEQ_IN_INDEX";

const FOREIGN_KEYS_SQL: &str = "SELECT CAST(k.CONSTRAINT_NAME AS CHAR), \
     CAST(k.COLUMN_NAME AS CHAR), CAST(k.REFERENCED_TABLE_NAME AS CHAR), \
     CAST(k.REFERENCED_COLUMN_NAME AS CHAR), CAST(r.UPDATE_RULE AS CHAR), \
     CAST(r.DELETE_RULE AS CHAR) \
     FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE k \
     JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS r \
       ON r.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA \
      AND r.CONSTRAINT_NAME = k.CONSTRAINT_NAME \
      AND r.TABLE_NAME = k.TABLE_NAME \
     WHERE k.TABLE_SCHEMA = DATABASE() AND k.TABLE_NAME = ? \
       AND k.REFERENCED_TABLE_NAME IS NOT NULL \
     ORDER BY k.CONSTRAINT_NAME, k.ORDINAL_POSITION";

/// A MySQL or MariaDB database reached through a connection pool.
#[derive(Debug, Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    /// Wraps an existing pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    ///
    /// # Errors
    ///
    /// Returns the sqlx error if the pool cannot connect.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl Database for MySqlDatabase {
    async fn execute(&self, sql: &str) -> Result<()> {
        // DDL goes over the text protocol; it takes no parameters.
        self.pool.execute(sql).await?;
        Ok(())
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(TABLES_SQL).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnRow>> {
        let rows: Vec<(String, String, String, String, Option<String>, String)> =
            sqlx::query_as(COLUMNS_SQL)
                .bind(table)
                .fetch_all(&self.pool)
                .await?;
        debug!(table = %table, count = rows.len(), "Fetched column metadata");

        Ok(rows
            .into_iter()
            .map(
                |(name, column_type, nullable, key, default, extra)| ColumnRow {
                    name,
                    column_type,
                    nullable,
                    key,
                    default,
                    extra,
                },
            )
            .collect())
    }

    async fn indexes(&self, table: &str) -> Result<Vec<IndexRow>> {
        let rows: Vec<(String, Option<String>, i64, i64)> = sqlx::query_as(INDEXES_SQL)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        debug!(table = %table, count = rows.len(), "Fetched index metadata");

        Ok(rows
            .into_iter()
            .map(|(name, column, non_unique, sequence)| IndexRow {
                name,
                column,
                non_unique: non_unique != 0,
                sequence,
            })
            .collect())
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyRow>> {
        let rows: Vec<(String, String, String, String, String, String)> =
            sqlx::query_as(FOREIGN_KEYS_SQL)
                .bind(table)
                .fetch_all(&self.pool)
                .await?;
        debug!(table = %table, count = rows.len(), "Fetched foreign key metadata");

        Ok(rows
            .into_iter()
            .map(
                |(name, column, referenced_table, referenced_column, update_rule, delete_rule)| {
                    ForeignKeyRow {
                        name,
                        column,
                        referenced_table,
                        referenced_column,
                        update_rule,
                        delete_rule,
                    }
                },
            )
            .collect())
    }
}
