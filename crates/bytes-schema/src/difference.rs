//! Structured "what changed" results for declared vs. existing entities.
//!
//! Comparison stops at the first differing property. The result records
//! which property it was and both values in a compact textual form; turning
//! it into a sentence is left to [`Difference`]'s `Display` impl.

use std::fmt;

use serde::Serialize;

use crate::declaration::{ColumnDeclaration, ForeignKeyDeclaration, IndexDeclaration};
use crate::types::{DataType, ForeignKeyRule};

/// The kind of entity a [`Difference`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Subject {
    /// A table column.
    Column,
    /// A table index.
    Index,
    /// A column's foreign key.
    ForeignKey,
}

/// The first property found to differ between a declaration and the live
/// database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    /// What kind of entity differs.
    pub subject: Subject,
    /// Name of the declared entity.
    pub name: String,
    /// Name of the differing property (`Arguments`, `Null`, `OnDelete`, ...).
    pub property: &'static str,
    /// Declared value.
    pub declared: String,
    /// Value found in the database.
    pub existing: String,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subject {
            Subject::Column => write!(
                f,
                "{} differs in the {} property from existing column ( {} => {} )",
                self.name, self.property, self.declared, self.existing
            ),
            Subject::Index => write!(
                f,
                "Index {} property {} differs from existing ( {} => {} )",
                self.name, self.property, self.declared, self.existing
            ),
            Subject::ForeignKey => write!(
                f,
                "Foreign key {} differs in the {} property from existing key ( {} => {} )",
                self.name, self.property, self.declared, self.existing
            ),
        }
    }
}

// =============================================================================
// Value rendering
// =============================================================================

/// Compact textual form of a compared value.
trait Render {
    fn render(&self) -> String;
}

impl Render for bool {
    fn render(&self) -> String {
        let rendered = if *self { "1" } else { "0" };
        rendered.to_string()
    }
}

impl Render for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl Render for Option<String> {
    fn render(&self) -> String {
        self.clone().unwrap_or_else(|| "NULL".to_string())
    }
}

impl Render for Vec<String> {
    fn render(&self) -> String {
        format!("[{}]", self.join(","))
    }
}

impl Render for DataType {
    fn render(&self) -> String {
        self.as_sql().to_string()
    }
}

impl Render for ForeignKeyRule {
    fn render(&self) -> String {
        self.as_sql().to_string()
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// Walks properties in order and keeps the first mismatch.
struct Comparison {
    subject: Subject,
    name: String,
    found: Option<Difference>,
}

impl Comparison {
    fn new(subject: Subject, name: &str) -> Self {
        Self {
            subject,
            name: name.to_string(),
            found: None,
        }
    }

    fn property<T: Render + PartialEq>(self, property: &'static str, declared: &T, existing: &T) -> Self {
        self.check(property, declared, existing, declared == existing)
    }

    fn property_ignore_case<T: Render>(
        self,
        property: &'static str,
        declared: &T,
        existing: &T,
    ) -> Self {
        let same = declared.render().to_lowercase() == existing.render().to_lowercase();
        self.check(property, declared, existing, same)
    }

    fn check<T: Render>(mut self, property: &'static str, declared: &T, existing: &T, same: bool) -> Self {
        if self.found.is_none() && !same {
            self.found = Some(Difference {
                subject: self.subject,
                name: self.name.clone(),
                property,
                declared: declared.render(),
                existing: existing.render(),
            });
        }
        self
    }

    fn finish(self) -> Option<Difference> {
        self.found
    }
}

/// Compares a declared column with its live counterpart.
///
/// `Drop` and the foreign key are not compared. Empty declared arguments
/// are replaced by the type's default arguments first, so `INT` without a
/// width matches the `int(11)` MySQL reports.
#[must_use]
pub fn columns_differ(declared: &ColumnDeclaration, existing: &ColumnDeclaration) -> Option<Difference> {
    Comparison::new(Subject::Column, &declared.name)
        .property("Name", &declared.name, &existing.name)
        .property("DataType", &declared.data_type, &existing.data_type)
        .property("Arguments", &declared.effective_arguments(), &existing.arguments)
        .property("Unsigned", &declared.unsigned, &existing.unsigned)
        .property("AutoIncrement", &declared.auto_increment, &existing.auto_increment)
        .property("Null", &declared.nullable, &existing.nullable)
        .property("Default", &declared.default, &existing.default)
        .property("PrimaryKey", &declared.primary_key, &existing.primary_key)
        .property("Unique", &declared.unique, &existing.unique)
        .finish()
}

/// Compares a declared index with the live index of the same name.
#[must_use]
pub fn indices_differ(declared: &IndexDeclaration, existing: &IndexDeclaration) -> Option<Difference> {
    Comparison::new(Subject::Index, &declared.name)
        .property("Name", &declared.name, &existing.name)
        .property("Unique", &declared.unique, &existing.unique)
        .property("Columns", &declared.columns, &existing.columns)
        .property("Drop", &declared.drop, &existing.drop)
        .finish()
}

/// Compares a declared foreign key with the live one, ignoring case and
/// the constraint name.
#[must_use]
pub fn foreign_keys_differ(
    declared: &ForeignKeyDeclaration,
    existing: &ForeignKeyDeclaration,
) -> Option<Difference> {
    Comparison::new(Subject::ForeignKey, &declared.name)
        .property_ignore_case("ReferenceTable", &declared.reference_table, &existing.reference_table)
        .property_ignore_case("ReferenceColumn", &declared.reference_column, &existing.reference_column)
        .property_ignore_case("OnDelete", &declared.on_delete, &existing.on_delete)
        .property_ignore_case("OnUpdate", &declared.on_update, &existing.on_update)
        .property_ignore_case("Drop", &declared.drop, &existing.drop)
        .finish()
}
