//! Manifests and the registry that selects them.
//!
//! A manifest is the schema blueprint of one implementation (an application
//! component). The registry maps implementation names to manifests; an
//! implementation may be given as a path, in which case its last segment
//! is the name.

use bytes_schema::{Schema, SchemaBuilder};

use crate::error::{InstallerError, Result};
use crate::manifests::UsersManifest;

/// Declares the tables one implementation needs.
pub trait Manifest {
    /// Implementation name, e.g. `Users`.
    fn name(&self) -> &str;

    /// Declares this implementation's tables on `schema`.
    fn declare(&self, schema: &mut SchemaBuilder) -> bytes_schema::Result<()>;

    /// Runs [`declare`](Self::declare) on a fresh builder and returns the
    /// declarations.
    fn declarations(&self) -> bytes_schema::Result<Schema> {
        let mut schema = SchemaBuilder::new();
        self.declare(&mut schema)?;
        Ok(schema.into_declarations())
    }
}

/// Manifests known to the installer, in registration order.
#[derive(Default)]
pub struct ManifestRegistry {
    manifests: Vec<Box<dyn Manifest>>,
}

impl ManifestRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every manifest shipped in this crate.
    #[must_use]
    pub fn bundled() -> Self {
        let mut registry = Self::new();
        registry.register(UsersManifest);
        registry
    }

    /// Adds a manifest.
    pub fn register(&mut self, manifest: impl Manifest + 'static) -> &mut Self {
        self.manifests.push(Box::new(manifest));
        self
    }

    /// Registered implementation names.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.manifests.iter().map(|m| m.name()).collect()
    }

    /// Looks up a manifest by implementation name or path.
    #[must_use]
    pub fn get(&self, implementation: &str) -> Option<&dyn Manifest> {
        let name = implementation_name(implementation);
        self.manifests
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.as_ref())
    }

    /// Selects manifests in request order. An empty request selects all of
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnknownImplementation`] for a name with no
    /// registered manifest.
    pub fn collect<S: AsRef<str>>(&self, implementations: &[S]) -> Result<Vec<&dyn Manifest>> {
        if implementations.is_empty() {
            return Ok(self.manifests.iter().map(|m| m.as_ref()).collect());
        }
        implementations
            .iter()
            .map(|implementation| {
                let implementation = implementation.as_ref();
                self.get(implementation)
                    .ok_or_else(|| InstallerError::UnknownImplementation(implementation.to_string()))
            })
            .collect()
    }
}

/// `Components/Users/` and `Users` both name the `Users` implementation.
fn implementation_name(implementation: &str) -> &str {
    let trimmed = implementation.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Logs;

    impl Manifest for Logs {
        fn name(&self) -> &str {
            "Logs"
        }

        fn declare(&self, schema: &mut SchemaBuilder) -> bytes_schema::Result<()> {
            let mut logs = schema.table("Logs")?;
            logs.column("Message", "TEXT", ())?;
            Ok(())
        }
    }

    #[test]
    fn test_implementation_name() {
        assert_eq!(implementation_name("Users"), "Users");
        assert_eq!(implementation_name("Components/Users/"), "Users");
        assert_eq!(implementation_name("/srv/app/Components/Logs"), "Logs");
    }

    #[test]
    fn test_collect_all_when_empty() {
        let mut registry = ManifestRegistry::bundled();
        registry.register(Logs);

        let selected = registry.collect::<&str>(&[]).unwrap();
        let names: Vec<&str> = selected.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Users", "Logs"]);
    }

    #[test]
    fn test_collect_in_request_order() {
        let mut registry = ManifestRegistry::bundled();
        registry.register(Logs);

        let selected = registry.collect(&["Components/Logs", "Users"]).unwrap();
        let names: Vec<&str> = selected.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Logs", "Users"]);
    }

    #[test]
    fn test_collect_unknown_implementation() {
        let registry = ManifestRegistry::bundled();
        let error = registry.collect(&["Billing"]).err().unwrap();
        assert!(matches!(error, InstallerError::UnknownImplementation(ref name) if name == "Billing"));
    }

    #[test]
    fn test_declarations_use_a_fresh_builder() {
        let first = Logs.declarations().unwrap();
        let second = Logs.declarations().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }
}
