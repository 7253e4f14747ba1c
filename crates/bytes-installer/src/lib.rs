//! Schema installer for Bytes implementations.
//!
//! `bytes-installer` compares the schemas declared by implementation
//! manifests with a live MySQL database and brings the database in line:
//!
//! - **Manifests** - per-implementation schema blueprints, selected through a registry
//! - **Analyst** - rebuilds the live schema in declaration shape
//! - **Installer** - diffs every selected manifest into one plan
//! - **Runner** - executes a plan best-effort, one outcome per statement
//! - **Output** - plain-text previews and execution reports
//!
//! # CLI Usage
//!
//! ```bash
//! # Preview the statements for every bundled implementation
//! bytes-installer plan
//!
//! # Execute them
//! bytes-installer apply --confirm
//!
//! # Dump what the analyst sees
//! bytes-installer --implementations Users inspect
//! ```

pub mod analyst;
pub mod config;
pub mod db;
pub mod error;
pub mod installer;
pub mod manifest;
pub mod manifests;
pub mod output;
pub mod runner;

pub use installer::Installer;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::analyst::DatabaseAnalyst;
    pub use crate::config::{Cli, Commands, InstallerOptions};
    pub use crate::db::{ColumnRow, Database, ForeignKeyRow, IndexRow, MySqlDatabase};
    pub use crate::error::{InstallerError, Result};
    pub use crate::installer::Installer;
    pub use crate::manifest::{Manifest, ManifestRegistry};
    pub use crate::manifests::UsersManifest;
    pub use crate::output::{render_executions, render_plan};
    pub use crate::runner::{Execution, Outcome, StatementRunner};
}
