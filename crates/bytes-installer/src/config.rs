//! Command-line and environment configuration.

use clap::{Parser, Subcommand};

/// Plans and applies manifest schemas against a MySQL database.
#[derive(Debug, Parser)]
#[command(name = "bytes-installer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database URL.
    #[arg(
        short,
        long,
        env = "DATABASE_URL",
        default_value = "mysql://root@localhost/bytes"
    )]
    pub database: String,

    /// Implementations to install, comma separated (all bundled if not specified).
    #[arg(
        short,
        long,
        env = "BYTES_IMPLEMENTATIONS",
        value_delimiter = ','
    )]
    pub implementations: Vec<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Show the statements that would be executed.
    Plan,

    /// Execute the planned statements.
    Apply {
        /// Actually execute; without it the plan is only shown.
        #[arg(long)]
        confirm: bool,
    },

    /// Print the analysed database schema as JSON.
    Inspect,
}

impl Cli {
    /// Installer options taken from the command line.
    #[must_use]
    pub fn options(&self) -> InstallerOptions {
        InstallerOptions {
            implementations: self
                .implementations
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Options for an [`Installer`](crate::Installer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerOptions {
    /// Implementations whose manifests are installed. Empty means all.
    pub implementations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "bytes-installer",
            "--database",
            "mysql://app@db/app",
            "--implementations",
            "Users, Logs",
            "apply",
            "--confirm",
        ])
        .unwrap();

        assert_eq!(cli.database, "mysql://app@db/app");
        assert_eq!(cli.command, Commands::Apply { confirm: true });
        assert_eq!(cli.options().implementations, vec!["Users", "Logs"]);
    }

    #[test]
    fn test_apply_requires_confirmation_flag() {
        let cli = Cli::try_parse_from(["bytes-installer", "-i", "Users", "apply"]).unwrap();
        assert_eq!(cli.command, Commands::Apply { confirm: false });
    }

    #[test]
    fn test_options_default_to_all() {
        assert!(InstallerOptions::default().implementations.is_empty());
    }
}
