//! Schema declaration types.
//!
//! The same shapes describe both the desired state (built by a manifest
//! through [`SchemaBuilder`](crate::SchemaBuilder)) and the existing state
//! (introspected from a live database), so the two can be diffed
//! structurally.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{DataType, ForeignKeyRule};

/// Lookup key for identifiers MySQL may fold to a different case.
fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// A foreign key attached to a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyDeclaration {
    /// Constraint name.
    pub name: String,
    /// Referenced table.
    pub reference_table: Option<String>,
    /// Referenced column.
    pub reference_column: Option<String>,
    /// `ON UPDATE` rule.
    pub on_update: ForeignKeyRule,
    /// `ON DELETE` rule.
    pub on_delete: ForeignKeyRule,
    /// Whether the constraint should be removed.
    pub drop: bool,
}

impl ForeignKeyDeclaration {
    /// Creates a foreign key with no references and CASCADE rules.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_table: None,
            reference_column: None,
            on_update: ForeignKeyRule::Cascade,
            on_delete: ForeignKeyRule::Cascade,
            drop: false,
        }
    }
}

/// A column in a table declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDeclaration {
    /// Column name.
    pub name: String,
    /// SQL data type.
    pub data_type: DataType,
    /// Type arguments, e.g. the length of a `VARCHAR` or the members of an `ENUM`.
    pub arguments: Vec<String>,
    /// `UNSIGNED` modifier.
    pub unsigned: bool,
    /// `AUTO_INCREMENT` modifier.
    pub auto_increment: bool,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Default value, rendered as a quoted literal.
    pub default: Option<String>,
    /// `PRIMARY KEY` modifier.
    pub primary_key: bool,
    /// `UNIQUE` modifier.
    pub unique: bool,
    /// Foreign key owned by this column.
    pub foreign_key: Option<ForeignKeyDeclaration>,
    /// Whether the column should be removed.
    pub drop: bool,
}

impl ColumnDeclaration {
    /// Creates a nullable column with no modifiers.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            arguments: Vec::new(),
            unsigned: false,
            auto_increment: false,
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
            foreign_key: None,
            drop: false,
        }
    }

    /// Sets the type arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// The declared arguments, or the ones MySQL reports when none were
    /// declared (see [`DataType::default_arguments`]).
    #[must_use]
    pub fn effective_arguments(&self) -> Vec<String> {
        if self.arguments.is_empty() {
            self.data_type.default_arguments(self.unsigned)
        } else {
            self.arguments.clone()
        }
    }
}

/// A named index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDeclaration {
    /// Index name.
    pub name: String,
    /// `UNIQUE` index.
    pub unique: bool,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Whether the index should be removed.
    pub drop: bool,
}

impl IndexDeclaration {
    /// Creates a non-unique index without columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique: false,
            columns: Vec::new(),
            drop: false,
        }
    }
}

/// A table: ordered columns plus named indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDeclaration {
    name: String,
    columns: Vec<ColumnDeclaration>,
    indices: Vec<IndexDeclaration>,
    #[serde(skip)]
    column_keys: HashMap<String, usize>,
}

impl TableDeclaration {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indices: Vec::new(),
            column_keys: HashMap::new(),
        }
    }

    /// Table name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDeclaration] {
        &self.columns
    }

    /// Indices in declaration order.
    #[must_use]
    pub fn indices(&self) -> &[IndexDeclaration] {
        &self.indices
    }

    /// Looks up a column, ignoring case.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDeclaration> {
        self.column_keys
            .get(&fold(name))
            .map(|&position| &self.columns[position])
    }

    /// Looks up an index by its exact name.
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexDeclaration> {
        self.indices.iter().find(|index| index.name == name)
    }

    /// Appends a column and returns it for further changes. When two
    /// columns share a name (ignoring case), lookups find the first one.
    pub fn push_column(&mut self, column: ColumnDeclaration) -> &mut ColumnDeclaration {
        let position = self.columns.len();
        self.column_keys
            .entry(fold(&column.name))
            .or_insert(position);
        self.columns.push(column);
        &mut self.columns[position]
    }

    /// Appends an index and returns it for further changes.
    pub fn push_index(&mut self, index: IndexDeclaration) -> &mut IndexDeclaration {
        let position = self.indices.len();
        self.indices.push(index);
        &mut self.indices[position]
    }
}

/// A set of tables keyed by name, in declaration (or introspection) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    tables: Vec<TableDeclaration>,
    #[serde(skip)]
    table_keys: HashMap<String, usize>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables in order.
    #[must_use]
    pub fn tables(&self) -> &[TableDeclaration] {
        &self.tables
    }

    /// Number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the schema has no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Looks up a table, ignoring case.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableDeclaration> {
        self.table_keys
            .get(&fold(name))
            .map(|&position| &self.tables[position])
    }

    /// Whether a table with exactly this name exists.
    #[must_use]
    pub fn contains_exact(&self, name: &str) -> bool {
        self.tables.iter().any(|table| table.name == name)
    }

    /// Appends a table and returns it for further changes. When two tables
    /// share a name (ignoring case), lookups find the first one.
    pub fn push_table(&mut self, table: TableDeclaration) -> &mut TableDeclaration {
        let position = self.tables.len();
        self.table_keys
            .entry(fold(&table.name))
            .or_insert(position);
        self.tables.push(table);
        &mut self.tables[position]
    }

    /// Every column of every table, in table order.
    pub fn all_columns(&self) -> impl Iterator<Item = &ColumnDeclaration> {
        self.tables.iter().flat_map(|table| table.columns.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup_ignores_case() {
        let mut schema = Schema::new();
        schema.push_table(TableDeclaration::new("Users"));

        assert!(schema.table("users").is_some());
        assert!(schema.table("USERS").is_some());
        assert!(schema.contains_exact("Users"));
        assert!(!schema.contains_exact("users"));
    }

    #[test]
    fn test_column_lookup_ignores_case() {
        let mut table = TableDeclaration::new("Users");
        table.push_column(ColumnDeclaration::new("Email", DataType::Varchar));

        assert_eq!(table.column("EMAIL").unwrap().name, "Email");
        assert!(table.column("Password").is_none());
    }

    #[test]
    fn test_effective_arguments() {
        let mut column = ColumnDeclaration::new("UserId", DataType::Int);
        assert_eq!(column.effective_arguments(), vec!["11"]);

        column.unsigned = true;
        assert_eq!(column.effective_arguments(), vec!["10"]);

        let column = column.with_arguments(vec!["5".to_string()]);
        assert_eq!(column.effective_arguments(), vec!["5"]);
    }

    #[test]
    fn test_all_columns_spans_tables() {
        let mut schema = Schema::new();
        schema
            .push_table(TableDeclaration::new("A"))
            .push_column(ColumnDeclaration::new("Id", DataType::Int));
        schema
            .push_table(TableDeclaration::new("B"))
            .push_column(ColumnDeclaration::new("Name", DataType::Text));

        let names: Vec<&str> = schema.all_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Name"]);
    }
}
