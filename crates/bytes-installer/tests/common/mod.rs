#![allow(dead_code)]

use std::sync::Mutex;

use bytes_installer::prelude::*;

/// Canned metadata for one table.
#[derive(Debug, Clone, Default)]
pub struct FakeTable {
    pub name: String,
    pub columns: Vec<ColumnRow>,
    pub indexes: Vec<IndexRow>,
    pub foreign_keys: Vec<ForeignKeyRow>,
}

impl FakeTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// A nullable column without key or extras.
    pub fn column(mut self, name: &str, column_type: &str) -> Self {
        self.columns.push(ColumnRow {
            name: name.to_string(),
            column_type: column_type.to_string(),
            nullable: "YES".to_string(),
            key: String::new(),
            default: None,
            extra: String::new(),
        });
        self
    }

    /// Reports missing defaults of nullable columns as the literal `NULL`,
    /// as MariaDB does.
    pub fn reported_by_mariadb(mut self) -> Self {
        for column in &mut self.columns {
            if column.nullable == "YES" && column.default.is_none() {
                column.default = Some("NULL".to_string());
            }
        }
        self
    }

    /// An `int(10) unsigned` auto-increment primary key.
    pub fn primary_key(mut self, name: &str) -> Self {
        self.columns.push(ColumnRow {
            name: name.to_string(),
            column_type: "int(10) unsigned".to_string(),
            nullable: "NO".to_string(),
            key: "PRI".to_string(),
            default: None,
            extra: "auto_increment".to_string(),
        });
        self.indexes.push(IndexRow {
            name: "PRIMARY".to_string(),
            column: Some(name.to_string()),
            non_unique: false,
            sequence: 1,
        });
        self
    }

    /// An `int(10) unsigned NOT NULL` column referencing `Users.UserId`
    /// with CASCADE rules, plus the index MySQL creates for it.
    pub fn user_reference(mut self, constraint: &str) -> Self {
        self.columns.push(ColumnRow {
            name: "UserId".to_string(),
            column_type: "int(10) unsigned".to_string(),
            nullable: "NO".to_string(),
            key: "MUL".to_string(),
            default: None,
            extra: String::new(),
        });
        self.indexes.push(IndexRow {
            name: constraint.to_string(),
            column: Some("UserId".to_string()),
            non_unique: true,
            sequence: 1,
        });
        self.foreign_keys.push(ForeignKeyRow {
            name: constraint.to_string(),
            column: "UserId".to_string(),
            referenced_table: "Users".to_string(),
            referenced_column: "UserId".to_string(),
            update_rule: "CASCADE".to_string(),
            delete_rule: "CASCADE".to_string(),
        });
        self
    }
}

/// In-memory stand-in for a MySQL database: canned metadata, recorded
/// statements and configurable failures.
#[derive(Debug, Default)]
pub struct FakeDatabase {
    tables: Vec<FakeTable>,
    failures: Vec<(String, String)>,
    executed: Mutex<Vec<String>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: FakeTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Reports every table the way MariaDB does.
    pub fn reported_by_mariadb(mut self) -> Self {
        self.tables = self
            .tables
            .into_iter()
            .map(FakeTable::reported_by_mariadb)
            .collect();
        self
    }

    /// Makes every statement containing `fragment` fail with `message`.
    pub fn fail_on(mut self, fragment: &str, message: &str) -> Self {
        self.failures
            .push((fragment.to_string(), message.to_string()));
        self
    }

    /// Statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    fn table(&self, name: &str) -> Option<&FakeTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl Database for FakeDatabase {
    async fn execute(&self, sql: &str) -> Result<()> {
        self.executed.lock().unwrap().push(sql.to_string());
        match self.failures.iter().find(|(fragment, _)| sql.contains(fragment.as_str())) {
            Some((_, message)) => Err(InstallerError::Database(sqlx::Error::Protocol(
                message.clone(),
            ))),
            None => Ok(()),
        }
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnRow>> {
        Ok(self.table(table).map(|t| t.columns.clone()).unwrap_or_default())
    }

    async fn indexes(&self, table: &str) -> Result<Vec<IndexRow>> {
        Ok(self.table(table).map(|t| t.indexes.clone()).unwrap_or_default())
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyRow>> {
        Ok(self
            .table(table)
            .map(|t| t.foreign_keys.clone())
            .unwrap_or_default())
    }
}

/// The `Users` table as MySQL reports it, with a configurable e-mail length.
pub fn users_table(email_length: u32) -> FakeTable {
    FakeTable::new("Users")
        .primary_key("UserId")
        .column("Email", &format!("varchar({email_length})"))
        .column("Password", "varchar(255)")
}

/// A database with every table of the `Users` manifest installed, listed
/// in the order MySQL sorts table names.
pub fn installed_users() -> FakeDatabase {
    FakeDatabase::new()
        .with_table(users_table(255))
        .with_table(
            FakeTable::new("Users_Authentications")
                .user_reference("FK_Authencations_Users")
                .column("Platform", "varchar(20)")
                .column("PlatformId", "varchar(32)"),
        )
        .with_table(
            FakeTable::new("Users_PasswordRecoveries")
                .user_reference("FK_Users_PasswordRecoveries_UserId")
                .column("Code", "varchar(255)")
                .column("DateCreated", "datetime"),
        )
        .with_table(
            FakeTable::new("Users_Profiles")
                .user_reference("FK_UserId_Users")
                .column("FirstName", "varchar(50)")
                .column("LastName", "varchar(50)")
                .column("ProfilePhotoURL", "varchar(255)")
                .column("Gender", "char(1)"),
        )
}

pub fn installer() -> Installer {
    Installer::new(ManifestRegistry::bundled(), InstallerOptions::default())
}
