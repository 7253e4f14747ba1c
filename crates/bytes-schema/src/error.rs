//! Error types for schema declaration and DDL generation.

use thiserror::Error;

/// Configuration and usage errors raised while declaring a schema or
/// rendering it into DDL.
///
/// None of these are recoverable at runtime: a manifest that triggers
/// one is wrong and the whole build/diff pass is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A table with the same name was already declared.
    #[error("Table {0} already declared.")]
    DuplicateTable(String),

    /// A column with the same name (ignoring case) already exists in the table.
    #[error("Column {column} already defined in table {table}")]
    DuplicateColumn {
        /// Table being declared.
        table: String,
        /// Offending column name.
        column: String,
    },

    /// An index with the same name already exists in the table.
    #[error("Index {index} already defined in table {table}")]
    DuplicateIndex {
        /// Table being declared.
        table: String,
        /// Offending index name.
        index: String,
    },

    /// Column names must contain at least one letter.
    #[error("You must choose a column name (got {0:?})")]
    InvalidColumnName(String),

    /// Index names must contain at least one letter.
    #[error("You must choose an index name (got {0:?})")]
    InvalidIndexName(String),

    /// Foreign key names must contain at least one letter or underscore.
    #[error("You must choose a foreign key name (got {0:?})")]
    InvalidForeignKeyName(String),

    /// The data type is not in the supported list.
    #[error("Unfortunately, the data type {given} is not one we currently support. Please choose from: {supported}")]
    UnknownDataType {
        /// The rejected type.
        given: String,
        /// Comma separated list of supported types.
        supported: String,
    },

    /// The referential rule is not one of the supported four.
    #[error("{given} is not a known setting for foreign key rules. Choose among: {supported}")]
    UnknownForeignKeyRule {
        /// The rejected rule.
        given: String,
        /// Comma separated list of supported rules.
        supported: String,
    },

    /// AUTO_INCREMENT columns cannot be nullable.
    #[error("AUTO_INCREMENT and NULL cannot both be true for column {0}")]
    AutoIncrementNullable(String),

    /// AUTO_INCREMENT columns must be the primary key.
    #[error("AUTO_INCREMENT and PRIMARY KEY both must be true for column {0}")]
    AutoIncrementWithoutPrimaryKey(String),

    /// A foreign key was declared without a referenced table or column.
    #[error("{0} wants to use foreign keys, but misses reference to table and column")]
    MissingReference(String),

    /// An index was declared without any columns.
    #[error("Columns not defined for index {0}")]
    IndexWithoutColumns(String),

    /// A table was declared without any columns, so it cannot be created.
    #[error("Table {0} must declare at least one column")]
    EmptyTable(String),
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
