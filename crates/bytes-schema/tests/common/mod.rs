#![allow(dead_code)]

use bytes_schema::prelude::*;

/// Declares `Users` the way the users component does, optionally with the
/// unique e-mail index.
pub fn users(email_length: u32, with_index: bool) -> Schema {
    let mut builder = SchemaBuilder::new();
    let mut users = builder.table("Users").unwrap();
    users
        .column("UserId", "INT", 10)
        .unwrap()
        .primary_key()
        .auto_increment()
        .unsigned()
        .not_null();
    users.column("Email", "VARCHAR", email_length).unwrap();
    if with_index {
        users
            .index("idx_email")
            .unwrap()
            .unique()
            .on_columns(["Email"])
            .unwrap();
    }
    builder.into_declarations()
}

/// `Users` plus `Users_Profiles`, whose `UserId` references `Users`.
pub fn users_with_profiles(on_delete: &str) -> Schema {
    let mut builder = SchemaBuilder::new();
    let mut users = builder.table("Users").unwrap();
    users
        .column("UserId", "INT", 10)
        .unwrap()
        .primary_key()
        .auto_increment()
        .unsigned()
        .not_null();

    let mut profiles = builder.table("Users_Profiles").unwrap();
    profiles
        .column("ProfileId", "INT", 10)
        .unwrap()
        .primary_key()
        .auto_increment()
        .unsigned()
        .not_null();
    profiles
        .column("UserId", "INT", 10)
        .unwrap()
        .unsigned()
        .not_null()
        .foreign_key("FK_UserId_Users")
        .unwrap()
        .references("Users", "UserId")
        .on_delete(on_delete)
        .unwrap()
        .on_update("CASCADE")
        .unwrap();
    builder.into_declarations()
}

/// Builds a plan, panicking with the error on failure.
pub fn plan(declared: &Schema, existing: &Schema) -> Plan {
    QueryFactory::new()
        .queries(declared, existing)
        .unwrap_or_else(|e| panic!("Failed to build plan: {e}"))
}

pub fn is_foreign_key(kind: StatementKind) -> bool {
    matches!(
        kind,
        StatementKind::AddForeignKey | StatementKind::DropForeignKey
    )
}
