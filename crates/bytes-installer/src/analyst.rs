//! Schema analyst.
//!
//! Reads the live database through [`Database`] and rebuilds it in the
//! declaration shape used by manifests, so the two can be diffed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use bytes_schema::{
    ColumnDeclaration, DataType, ForeignKeyDeclaration, ForeignKeyRule, IndexDeclaration, Schema,
    TableDeclaration,
};

use crate::db::{ColumnRow, Database, ForeignKeyRow, IndexRow};
use crate::error::{InstallerError, Result};

static BASE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z]+)").expect("Invalid base type regex"));

static TYPE_ARGUMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?\(([^)]+)\)").expect("Invalid type arguments regex"));

/// Introspects a live database.
pub struct DatabaseAnalyst<'a, D: Database> {
    database: &'a D,
}

impl<'a, D: Database> DatabaseAnalyst<'a, D> {
    /// Creates an analyst reading from `database`.
    pub fn new(database: &'a D) -> Self {
        Self { database }
    }

    /// Analyses every table of the database.
    ///
    /// # Errors
    ///
    /// Returns any database error, or [`InstallerError::InvalidMetadata`]
    /// when a table reports metadata that cannot be parsed.
    pub async fn analyze_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new();
        for name in self.database.table_names().await? {
            let table = self.analyze_table(&name).await?;
            schema.push_table(table);
        }
        Ok(schema)
    }

    /// Analyses the columns, foreign keys and indices of one table.
    ///
    /// # Errors
    ///
    /// See [`DatabaseAnalyst::analyze_schema`].
    pub async fn analyze_table(&self, name: &str) -> Result<TableDeclaration> {
        let columns = self.database.columns(name).await?;
        let foreign_keys = self.database.foreign_keys(name).await?;
        let indexes = self.database.indexes(name).await?;

        let mut table = TableDeclaration::new(name);
        for column in parse_columns(name, &columns, &foreign_keys)? {
            table.push_column(column);
        }
        for index in parse_indices(name, &indexes)? {
            table.push_index(index);
        }

        info!(
            table = %name,
            columns = table.columns().len(),
            indices = table.indices().len(),
            "Analysed table"
        );
        Ok(table)
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn invalid(table: &str, message: impl Into<String>) -> InstallerError {
    InstallerError::InvalidMetadata {
        table: table.to_string(),
        message: message.into(),
    }
}

/// Splits the parenthesised suffix of a column type into arguments,
/// stripping surrounding quotes from each.
fn type_arguments(column_type: &str) -> Vec<String> {
    let Some(captures) = TYPE_ARGUMENTS.captures(column_type) else {
        return Vec::new();
    };
    captures[1]
        .split(',')
        .map(|argument| {
            let quoted = argument.len() >= 2
                && argument.starts_with(['"', '\''])
                && argument.ends_with(['"', '\'']);
            if quoted {
                argument[1..argument.len() - 1].to_string()
            } else {
                argument.to_string()
            }
        })
        .collect()
}

/// Normalizes a reported column default. MariaDB reports a missing
/// default as the literal `NULL` and quotes string defaults (`'abc'`),
/// while MySQL reports SQL NULL and the bare value.
fn introspected_default(raw: Option<&str>) -> Option<String> {
    match raw {
        None | Some("" | "NULL") => None,
        Some(value) if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') => {
            Some(value[1..value.len() - 1].replace("''", "'"))
        }
        Some(value) => Some(value.to_string()),
    }
}

fn parse_rule(table: &str, rule: &str) -> Result<ForeignKeyRule> {
    rule.parse::<ForeignKeyRule>()
        .map_err(|e| invalid(table, e.to_string()))
}

/// Converts column metadata rows into declarations, attaching the foreign
/// key whose column matches (ignoring case).
pub fn parse_columns(
    table: &str,
    columns: &[ColumnRow],
    foreign_keys: &[ForeignKeyRow],
) -> Result<Vec<ColumnDeclaration>> {
    columns
        .iter()
        .map(|row| -> Result<ColumnDeclaration> {
            let base = BASE_TYPE
                .captures(&row.column_type)
                .map(|captures| captures[1].to_string())
                .ok_or_else(|| {
                    invalid(
                        table,
                        format!("column {} has type {:?}", row.name, row.column_type),
                    )
                })?;

            let data_type = DataType::from_introspected(&base);
            let mut column = ColumnDeclaration::new(row.name.clone(), data_type)
                .with_arguments(type_arguments(&row.column_type));
            column.unsigned = row.column_type.to_lowercase().contains("unsigned");
            column.nullable = row.nullable == "YES";
            column.auto_increment = row.extra == "auto_increment";
            column.default = introspected_default(row.default.as_deref());
            column.primary_key = row.key == "PRI";

            // Later rows win, as a column can carry only one key here.
            for key in foreign_keys
                .iter()
                .filter(|key| key.column.eq_ignore_ascii_case(&row.name))
            {
                let mut foreign_key = ForeignKeyDeclaration::new(key.name.clone());
                foreign_key.reference_table = Some(key.referenced_table.clone());
                foreign_key.reference_column = Some(key.referenced_column.clone());
                foreign_key.on_update = parse_rule(table, &key.update_rule)?;
                foreign_key.on_delete = parse_rule(table, &key.delete_rule)?;
                column.foreign_key = Some(foreign_key);
            }

            Ok(column)
        })
        .collect()
}

/// Groups index metadata rows by index name, placing each column at its
/// position within the index.
pub fn parse_indices(table: &str, rows: &[IndexRow]) -> Result<Vec<IndexDeclaration>> {
    let mut indices: Vec<(IndexDeclaration, Vec<Option<String>>)> = Vec::new();

    for row in rows {
        let Some(ref column) = row.column else {
            continue;
        };
        let position = usize::try_from(row.sequence - 1).map_err(|_| {
            invalid(
                table,
                format!("index {} has sequence {}", row.name, row.sequence),
            )
        })?;

        let slot = match indices.iter().position(|(index, _)| index.name == row.name) {
            Some(slot) => slot,
            None => {
                let mut index = IndexDeclaration::new(row.name.clone());
                index.unique = !row.non_unique;
                indices.push((index, Vec::new()));
                indices.len() - 1
            }
        };

        let columns = &mut indices[slot].1;
        if columns.len() <= position {
            columns.resize(position + 1, None);
        }
        columns[position] = Some(column.clone());
    }

    Ok(indices
        .into_iter()
        .map(|(mut index, columns)| {
            index.columns = columns.into_iter().flatten().collect();
            index
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, column_type: &str) -> ColumnRow {
        ColumnRow {
            name: name.to_string(),
            column_type: column_type.to_string(),
            nullable: "YES".to_string(),
            key: String::new(),
            default: None,
            extra: String::new(),
        }
    }

    fn index(name: &str, column: &str, sequence: i64) -> IndexRow {
        IndexRow {
            name: name.to_string(),
            column: Some(column.to_string()),
            non_unique: false,
            sequence,
        }
    }

    #[test]
    fn test_type_arguments() {
        assert_eq!(type_arguments("int(10) unsigned"), vec!["10"]);
        assert_eq!(type_arguments("decimal(10,2)"), vec!["10", "2"]);
        assert_eq!(type_arguments("enum('m','f')"), vec!["m", "f"]);
        assert!(type_arguments("datetime").is_empty());
    }

    #[test]
    fn test_parse_primary_key_column() {
        let mut row = column("UserId", "int(10) unsigned");
        row.nullable = "NO".to_string();
        row.key = "PRI".to_string();
        row.extra = "auto_increment".to_string();

        let parsed = parse_columns("Users", &[row], &[]).unwrap();
        let user_id = &parsed[0];
        assert_eq!(user_id.data_type, DataType::Int);
        assert_eq!(user_id.arguments, vec!["10"]);
        assert!(user_id.unsigned);
        assert!(!user_id.nullable);
        assert!(user_id.primary_key);
        assert!(user_id.auto_increment);
        assert!(!user_id.unique);
        assert!(user_id.foreign_key.is_none());
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let parsed = parse_columns("Docs", &[column("Body", "json")], &[]).unwrap();
        assert_eq!(parsed[0].data_type, DataType::Unsupported("JSON".to_string()));
    }

    #[test]
    fn test_unparseable_type_is_rejected() {
        let error = parse_columns("Docs", &[column("Body", "(weird)")], &[]).unwrap_err();
        assert!(matches!(error, InstallerError::InvalidMetadata { ref table, .. } if table == "Docs"));
    }

    #[test]
    fn test_defaults_reported_by_mysql() {
        let mut with_default = column("Status", "varchar(20)");
        with_default.default = Some("active".to_string());
        let parsed = parse_columns("Users", &[column("Email", "varchar(255)"), with_default], &[]).unwrap();

        assert_eq!(parsed[0].default, None);
        assert_eq!(parsed[1].default.as_deref(), Some("active"));
    }

    #[test]
    fn test_defaults_reported_by_mariadb() {
        let mut without_default = column("Email", "varchar(255)");
        without_default.default = Some("NULL".to_string());
        let mut quoted = column("Status", "varchar(20)");
        quoted.default = Some("'it''s'".to_string());
        let mut numeric = column("Attempts", "int(11)");
        numeric.default = Some("0".to_string());

        let parsed = parse_columns("Users", &[without_default, quoted, numeric], &[]).unwrap();
        assert_eq!(parsed[0].default, None);
        assert_eq!(parsed[1].default.as_deref(), Some("it's"));
        assert_eq!(parsed[2].default.as_deref(), Some("0"));
    }

    #[test]
    fn test_foreign_key_matches_column_ignoring_case() {
        let key = ForeignKeyRow {
            name: "FK_UserId_Users".to_string(),
            column: "userid".to_string(),
            referenced_table: "Users".to_string(),
            referenced_column: "UserId".to_string(),
            update_rule: "CASCADE".to_string(),
            delete_rule: "SET NULL".to_string(),
        };

        let parsed = parse_columns(
            "Users_Profiles",
            &[column("UserId", "int(10) unsigned"), column("FirstName", "varchar(50)")],
            &[key],
        )
        .unwrap();

        let foreign_key = parsed[0].foreign_key.as_ref().unwrap();
        assert_eq!(foreign_key.name, "FK_UserId_Users");
        assert_eq!(foreign_key.reference_table.as_deref(), Some("Users"));
        assert_eq!(foreign_key.on_delete, ForeignKeyRule::SetNull);
        assert!(parsed[1].foreign_key.is_none());
    }

    #[test]
    fn test_indices_are_grouped_by_sequence() {
        let mut rows = vec![
            index("idx_name", "LastName", 2),
            index("PRIMARY", "UserId", 1),
            index("idx_name", "FirstName", 1),
        ];
        rows[0].non_unique = true;
        rows[2].non_unique = true;

        let indices = parse_indices("Users_Profiles", &rows).unwrap();
        assert_eq!(indices.len(), 2);
        assert_eq!(indices[0].name, "idx_name");
        assert!(!indices[0].unique);
        assert_eq!(indices[0].columns, vec!["FirstName", "LastName"]);
        assert_eq!(indices[1].name, "PRIMARY");
        assert!(indices[1].unique);
    }

    #[test]
    fn test_invalid_index_sequence() {
        let error = parse_indices("Users", &[index("idx", "Email", 0)]).unwrap_err();
        assert!(matches!(error, InstallerError::InvalidMetadata { .. }));
    }
}
