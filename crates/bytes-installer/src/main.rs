//! bytes-installer CLI
//!
//! Command-line front end for planning and applying manifest schemas.

use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use bytes_installer::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database = MySqlDatabase::connect(&cli.database).await?;
    let installer = Installer::new(ManifestRegistry::bundled(), cli.options());

    match cli.command {
        Commands::Plan | Commands::Apply { confirm: false } => {
            let plan = installer.plan(&database).await?;
            print!("{}", render_plan(&plan));
        }

        Commands::Apply { confirm: true } => {
            info!("Applying planned statements...");
            let executions = installer.apply(&database).await?;
            print!("{}", render_executions(&executions));

            let failed = executions.iter().filter(|e| !e.is_ok()).count();
            if failed > 0 {
                warn!(failed, "Some statements failed; re-run `plan` to see what is left.");
            }
        }

        Commands::Inspect => {
            let existing = DatabaseAnalyst::new(&database).analyze_schema().await?;
            println!("{}", serde_json::to_string_pretty(&existing)?);
        }
    }

    Ok(())
}
