//! suki-pe - Persona Inference Engine CLI
//!
//! Batch entry point: loads configuration, opens the database, and runs the
//! requested recompute over the active rule snapshot.

use anyhow::Result;
use clap::Parser;
use suki_common::config::{self, ConfigOverrides, TomlConfig};
use suki_pe::cli::{build_scope, Cli, Commands};
use suki_pe::recompute::{self, RecomputeOptions};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Suki Persona Engine (suki-pe) v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let toml_config = TomlConfig::load(&config_path)?;

    let overrides = ConfigOverrides {
        database_path: cli.database.clone(),
        root_folder: cli.root_folder.clone(),
    };
    let db_path = config::resolve_database_path(&overrides, &toml_config);
    info!("Database: {}", db_path.display());

    // Fail fast: an unreachable database aborts before anything is written
    let pool = match suki_common::db::init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Commands::Recompute {
            from,
            to,
            ids,
            dry_run,
            workers,
            export_signals,
        } => {
            let scope = build_scope(from.as_deref(), to.as_deref(), &ids)?;
            let report = recompute::run(
                &pool,
                RecomputeOptions {
                    scope,
                    dry_run,
                    workers,
                    export_signals,
                },
            )
            .await?;

            for line in report.display_lines() {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
