use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commonlabtest::config::redact_dsn;
use commonlabtest::{AppConfig, Migrator, init_logging};
use sea_orm_migration::MigratorTrait;

/// Common Lab Test - operator tooling for the lab test store
#[derive(Parser)]
#[command(name = "commonlabtest")]
#[command(about = "Common Lab Test - operator tooling for the lab test store")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    /// Print effective configuration (JSON) and exit
    PrintConfig,
    /// Connect to the database and apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Layered config: defaults -> YAML (if provided) -> env (COMMONLABTEST__*)
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Check => {
            check_config(&config);
            Ok(())
        }
        Commands::PrintConfig => print_config(config),
        Commands::Migrate => migrate(&config).await,
    }
}

fn check_config(config: &AppConfig) {
    tracing::info!(dsn = %redact_dsn(&config.database.dsn), "Configuration is valid");
    println!("Configuration OK");
}

fn print_config(mut config: AppConfig) -> Result<()> {
    config.database.dsn = redact_dsn(&config.database.dsn);
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn migrate(config: &AppConfig) -> Result<()> {
    let db = config.database.connect().await?;

    let pending = Migrator::get_pending_migrations(&db).await?;
    if pending.is_empty() {
        tracing::info!("Schema is up to date");
        return Ok(());
    }

    tracing::info!(count = pending.len(), "Applying migrations");
    Migrator::up(&db, None).await?;
    tracing::info!("Migrations applied");
    Ok(())
}
