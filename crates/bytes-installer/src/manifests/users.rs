//! Users and authentication tables.

use bytes_schema::{Result, SchemaBuilder};

use crate::manifest::Manifest;

/// Accounts, external authentications, profiles and password recoveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsersManifest;

impl Manifest for UsersManifest {
    fn name(&self) -> &str {
        "Users"
    }

    fn declare(&self, schema: &mut SchemaBuilder) -> Result<()> {
        // ---- Users ----
        let mut users = schema.table("Users")?;
        users
            .column("UserId", "INT", 10)?
            .primary_key()
            .auto_increment()
            .unsigned()
            .not_null();
        users.column("Email", "VARCHAR", 255)?;
        users.column("Password", "VARCHAR", 255)?;

        // ---- Users_Authentications ----
        let mut authentications = schema.table("Users_Authentications")?;
        authentications
            .column("UserId", "INT", 10)?
            .unsigned()
            .not_null()
            .foreign_key("FK_Authencations_Users")?
            .references("Users", "UserId")
            .on_delete("CASCADE")?
            .on_update("CASCADE")?;
        authentications.column("Platform", "VARCHAR", 20)?;
        authentications.column("PlatformId", "VARCHAR", 32)?;

        // ---- Users_Profiles ----
        let mut profiles = schema.table("Users_Profiles")?;
        profiles
            .column("UserId", "INT", 10)?
            .unsigned()
            .not_null()
            .foreign_key("FK_UserId_Users")?
            .references("Users", "UserId")
            .on_delete("CASCADE")?
            .on_update("CASCADE")?;
        profiles.column("FirstName", "VARCHAR", 50)?;
        profiles.column("LastName", "VARCHAR", 50)?;
        profiles.column("ProfilePhotoURL", "VARCHAR", 255)?;
        profiles.column("Gender", "CHAR", 1)?;

        // ---- Users_PasswordRecoveries ----
        let mut recoveries = schema.table("Users_PasswordRecoveries")?;
        recoveries
            .column("UserId", "INT", 10)?
            .unsigned()
            .not_null()
            .foreign_key("FK_Users_PasswordRecoveries_UserId")?
            .references("Users", "UserId")
            .on_delete("CASCADE")?
            .on_update("CASCADE")?;
        recoveries.column("Code", "VARCHAR", 255)?;
        recoveries.column("DateCreated", "DATETIME", ())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_declarations() {
        let schema = UsersManifest.declarations().unwrap();
        let names: Vec<&str> = schema.tables().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "Users",
                "Users_Authentications",
                "Users_Profiles",
                "Users_PasswordRecoveries"
            ]
        );

        let profiles = schema.table("Users_Profiles").unwrap();
        assert_eq!(profiles.columns().len(), 5);
        let foreign_key = profiles.column("UserId").unwrap().foreign_key.as_ref().unwrap();
        assert_eq!(foreign_key.reference_table.as_deref(), Some("Users"));
    }
}
