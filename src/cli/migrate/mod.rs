//! Migrate command - manages the PostgreSQL schema outside the server

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{Migrator, PostgresConfig, PostgresMigrator};

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying pending ones
    #[arg(long, conflicts_with = "status")]
    pub revert: bool,

    /// Print the current schema version and exit
    #[arg(long)]
    pub status: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let pool = PostgresConfig::from_storage_config(&config.storage)?
        .connect()
        .await?;
    let migrator = PostgresMigrator::new(pool);

    if args.status {
        match migrator.version().await? {
            Some(version) => info!(version, "Current schema version"),
            None => info!("No migrations applied"),
        }
    } else if args.revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
        info!("Migrations up to date");
    }

    Ok(())
}
