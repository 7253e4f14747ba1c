//! Installer orchestration.
//!
//! Collects the selected manifests, diffs each one against the analysed
//! database and, when asked to, runs the resulting statements.

use tracing::info;

use bytes_schema::{Plan, QueryFactory, Schema};

use crate::analyst::DatabaseAnalyst;
use crate::config::InstallerOptions;
use crate::db::Database;
use crate::error::Result;
use crate::manifest::ManifestRegistry;
use crate::runner::{Execution, StatementRunner};

/// Plans and applies the schemas of the selected implementations.
pub struct Installer {
    registry: ManifestRegistry,
    options: InstallerOptions,
    factory: QueryFactory,
}

impl Installer {
    /// Creates an installer over `registry`.
    pub fn new(registry: ManifestRegistry, options: InstallerOptions) -> Self {
        Self {
            registry,
            options,
            factory: QueryFactory::new(),
        }
    }

    /// Returns the manifest registry.
    #[must_use]
    pub fn registry(&self) -> &ManifestRegistry {
        &self.registry
    }

    /// Returns the installer options.
    #[must_use]
    pub fn options(&self) -> &InstallerOptions {
        &self.options
    }

    /// The statements needed to bring `existing` in line with every
    /// selected manifest.
    ///
    /// Each manifest is diffed against the same snapshot and the plans are
    /// concatenated in manifest order. Descriptions stay with their
    /// statements.
    ///
    /// # Errors
    ///
    /// Fails on an unknown implementation name or an invalid declaration.
    pub fn intentions(&self, existing: &Schema) -> Result<Plan> {
        let mut intentions = Plan::new();

        for manifest in self.registry.collect(&self.options.implementations)? {
            let declarations = manifest.declarations()?;
            let plan = self.factory.queries(&declarations, existing)?;
            info!(
                implementation = manifest.name(),
                tables = declarations.len(),
                statements = plan.len(),
                "Planned implementation"
            );
            intentions.append(plan);
        }

        Ok(intentions)
    }

    /// Analyses `database` and returns the intentions against it.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be analysed or planning fails.
    pub async fn plan<D: Database>(&self, database: &D) -> Result<Plan> {
        let existing = DatabaseAnalyst::new(database).analyze_schema().await?;
        self.intentions(&existing)
    }

    /// Plans against `database` and runs every statement best-effort.
    ///
    /// # Errors
    ///
    /// Fails only when planning fails. Statement failures are reported in
    /// the returned executions.
    pub async fn apply<D: Database>(&self, database: &D) -> Result<Vec<Execution>> {
        let plan = self.plan(database).await?;
        let executions = StatementRunner::new(database).run(plan.statements()).await;

        let failed = executions.iter().filter(|e| !e.is_ok()).count();
        info!(
            executed = executions.len() - failed,
            failed,
            "Applied plan"
        );
        Ok(executions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes_schema::StatementKind;

    #[test]
    fn test_intentions_on_empty_database() {
        let installer = Installer::new(ManifestRegistry::bundled(), InstallerOptions::default());
        let plan = installer.intentions(&Schema::new()).unwrap();

        let creates = plan
            .statements()
            .iter()
            .filter(|s| s.kind == StatementKind::CreateTable)
            .count();
        assert_eq!(creates, 4);
        assert_eq!(
            plan.statements().last().map(|s| s.kind),
            Some(StatementKind::AddForeignKey)
        );
        assert!(plan.descriptions().is_empty());
    }

    #[test]
    fn test_intentions_reject_unknown_implementation() {
        let options = InstallerOptions {
            implementations: vec!["Billing".to_string()],
        };
        let installer = Installer::new(ManifestRegistry::bundled(), options);
        assert!(installer.intentions(&Schema::new()).is_err());
    }
}
