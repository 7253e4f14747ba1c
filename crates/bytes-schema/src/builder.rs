//! Handle-based schema builder.
//!
//! A manifest declares its tables through a [`SchemaBuilder`]. Each call
//! that creates an entity returns a handle bound to exactly that entity, so
//! modifiers can never land on "whatever was touched last":
//!
//! ```
//! use bytes_schema::SchemaBuilder;
//!
//! # fn main() -> bytes_schema::Result<()> {
//! let mut schema = SchemaBuilder::new();
//!
//! let mut users = schema.table("Users")?;
//! users
//!     .column("UserId", "INT", 10)?
//!     .primary_key()
//!     .auto_increment()
//!     .unsigned()
//!     .not_null();
//! users.column("Email", "VARCHAR", 255)?;
//! users.index("idx_email")?.unique().on_columns(["Email"])?;
//!
//! let mut profiles = schema.table("Users_Profiles")?;
//! profiles
//!     .column("UserId", "INT", 10)?
//!     .unsigned()
//!     .not_null()
//!     .foreign_key("FK_UserId_Users")?
//!     .references("Users", "UserId")
//!     .on_delete("CASCADE")?
//!     .on_update("CASCADE")?;
//!
//! let declarations = schema.into_declarations();
//! assert_eq!(declarations.len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::declaration::{
    ColumnDeclaration, ForeignKeyDeclaration, IndexDeclaration, Schema, TableDeclaration,
};
use crate::error::{Result, SchemaError};
use crate::types::{DataType, ForeignKeyRule};

// =============================================================================
// Arguments
// =============================================================================

/// Values accepted as column type arguments: a single scalar, a list, or
/// `()` for none.
pub trait IntoArguments {
    /// Converts into the argument list stored on the column.
    fn into_arguments(self) -> Vec<String>;
}

impl IntoArguments for () {
    fn into_arguments(self) -> Vec<String> {
        Vec::new()
    }
}

impl IntoArguments for &str {
    fn into_arguments(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoArguments for String {
    fn into_arguments(self) -> Vec<String> {
        vec![self]
    }
}

impl<T: ToString> IntoArguments for Vec<T> {
    fn into_arguments(self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl<T: ToString> IntoArguments for &[T] {
    fn into_arguments(self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl<T: ToString, const N: usize> IntoArguments for [T; N] {
    fn into_arguments(self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

macro_rules! scalar_arguments {
    ($($ty:ty),*) => {
        $(
            impl IntoArguments for $ty {
                fn into_arguments(self) -> Vec<String> {
                    vec![self.to_string()]
                }
            }
        )*
    };
}

scalar_arguments!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

fn has_letter(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_alphabetic())
}

// =============================================================================
// SchemaBuilder
// =============================================================================

/// Accumulates the table declarations of one manifest.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new table.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateTable`] if a table with exactly this
    /// name was already declared.
    pub fn table(&mut self, name: impl Into<String>) -> Result<TableBuilder<'_>> {
        let name = name.into();
        if self.schema.contains_exact(&name) {
            return Err(SchemaError::DuplicateTable(name));
        }
        let table = self.schema.push_table(TableDeclaration::new(name));
        Ok(TableBuilder { table })
    }

    /// The declarations accumulated so far.
    #[must_use]
    pub fn declarations(&self) -> &Schema {
        &self.schema
    }

    /// Finishes building and hands over the declarations.
    #[must_use]
    pub fn into_declarations(self) -> Schema {
        self.schema
    }
}

// =============================================================================
// TableBuilder
// =============================================================================

/// Handle to a table being declared.
#[derive(Debug)]
pub struct TableBuilder<'a> {
    table: &'a mut TableDeclaration,
}

impl TableBuilder<'_> {
    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.table.name()
    }

    /// Declares a column.
    ///
    /// # Errors
    ///
    /// Fails if a column with the same name (ignoring case) exists, if the
    /// name has no letters, or if `data_type` is not a supported type.
    pub fn column(
        &mut self,
        name: impl Into<String>,
        data_type: &str,
        arguments: impl IntoArguments,
    ) -> Result<ColumnBuilder<'_>> {
        let name = name.into();
        if self.table.column(&name).is_some() {
            return Err(SchemaError::DuplicateColumn {
                table: self.table.name().to_string(),
                column: name,
            });
        }
        if !has_letter(&name) {
            return Err(SchemaError::InvalidColumnName(name));
        }
        let data_type: DataType = data_type.parse()?;

        let column = self.table.push_column(
            ColumnDeclaration::new(name, data_type).with_arguments(arguments.into_arguments()),
        );
        Ok(ColumnBuilder { column })
    }

    /// Declares a named index. Its columns are set with
    /// [`IndexBuilder::on_columns`].
    ///
    /// # Errors
    ///
    /// Fails if the name has no letters or the table already declares an
    /// index with this name.
    pub fn index(&mut self, name: impl Into<String>) -> Result<IndexBuilder<'_>> {
        let name = name.into();
        if !has_letter(&name) {
            return Err(SchemaError::InvalidIndexName(name));
        }
        if self.table.index(&name).is_some() {
            return Err(SchemaError::DuplicateIndex {
                table: self.table.name().to_string(),
                index: name,
            });
        }
        let index = self.table.push_index(IndexDeclaration::new(name));
        Ok(IndexBuilder { index })
    }
}

// =============================================================================
// ColumnBuilder
// =============================================================================

/// Handle to a declared column.
#[derive(Debug)]
pub struct ColumnBuilder<'a> {
    column: &'a mut ColumnDeclaration,
}

impl<'a> ColumnBuilder<'a> {
    /// Marks the column as the primary key.
    pub fn primary_key(self) -> Self {
        self.column.primary_key = true;
        self
    }

    /// Marks the column NOT NULL.
    pub fn not_null(self) -> Self {
        self.column.nullable = false;
        self
    }

    /// Marks the column UNSIGNED.
    pub fn unsigned(self) -> Self {
        self.column.unsigned = true;
        self
    }

    /// Marks the column AUTO_INCREMENT. Only valid together with
    /// [`primary_key`](Self::primary_key) and [`not_null`](Self::not_null);
    /// this is checked when the column is rendered.
    pub fn auto_increment(self) -> Self {
        self.column.auto_increment = true;
        self
    }

    /// Sets the default value.
    pub fn default(self, value: impl ToString) -> Self {
        self.column.default = Some(value.to_string());
        self
    }

    /// Requests removal of the column from the live table.
    pub fn drop_column(self) -> Self {
        self.column.drop = true;
        self
    }

    /// Attaches a foreign key to the column. The key defaults to CASCADE
    /// for both rules and needs [`ForeignKeyBuilder::references`].
    pub fn foreign_key(self, name: impl Into<String>) -> Result<ForeignKeyBuilder<'a>> {
        let name = name.into();
        if !name.chars().any(|c| c.is_ascii_alphabetic() || c == '_') {
            return Err(SchemaError::InvalidForeignKeyName(name));
        }
        let column = self.column;
        let foreign_key = column.foreign_key.insert(ForeignKeyDeclaration::new(name));
        Ok(ForeignKeyBuilder { foreign_key })
    }
}

// =============================================================================
// IndexBuilder
// =============================================================================

/// Handle to a declared index.
#[derive(Debug)]
pub struct IndexBuilder<'a> {
    index: &'a mut IndexDeclaration,
}

impl IndexBuilder<'_> {
    /// Makes the index UNIQUE.
    pub fn unique(self) -> Self {
        self.index.unique = true;
        self
    }

    /// Sets the indexed columns. Fails on an empty list.
    pub fn on_columns<I, S>(self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(SchemaError::IndexWithoutColumns(self.index.name.clone()));
        }
        self.index.columns = columns;
        Ok(self)
    }

    /// Requests removal of the index from the live table.
    pub fn drop_index(self) -> Self {
        self.index.drop = true;
        self
    }
}

// =============================================================================
// ForeignKeyBuilder
// =============================================================================

/// Handle to a column's foreign key.
#[derive(Debug)]
pub struct ForeignKeyBuilder<'a> {
    foreign_key: &'a mut ForeignKeyDeclaration,
}

impl ForeignKeyBuilder<'_> {
    /// Sets the referenced table and column.
    pub fn references(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key.reference_table = Some(table.into());
        self.foreign_key.reference_column = Some(column.into());
        self
    }

    /// Sets the `ON UPDATE` rule (`CASCADE`, `SET NULL`, `NO ACTION` or `RESTRICT`).
    pub fn on_update(self, rule: &str) -> Result<Self> {
        self.foreign_key.on_update = rule.parse::<ForeignKeyRule>()?;
        Ok(self)
    }

    /// Sets the `ON DELETE` rule (`CASCADE`, `SET NULL`, `NO ACTION` or `RESTRICT`).
    pub fn on_delete(self, rule: &str) -> Result<Self> {
        self.foreign_key.on_delete = rule.parse::<ForeignKeyRule>()?;
        Ok(self)
    }

    /// Requests removal of the constraint from the live table.
    pub fn drop_foreign_key(self) -> Self {
        self.foreign_key.drop = true;
        self
    }
}
