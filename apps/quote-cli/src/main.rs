//! # solar-quote
//!
//! Command-line front end for Solar Quote.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        solar-quote binary                               │
//! │                                                                         │
//! │  args (clap) ──► AppConfig (config crate) ──► Database (solar-db)      │
//! │                                                  │                      │
//! │       ┌───────────┬──────────────┬───────────────┼──────────┐          │
//! │       ▼           ▼              ▼               ▼          ▼          │
//! │     quote      catalog       integrator       archive      seed        │
//! │       │                                                                 │
//! │       └──► snapshot ──► next number ──► price (solar-core) ──► archive │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors from any layer surface as one line on stderr and a non-zero exit.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::archive::ArchiveCommand;
use crate::commands::catalog::CatalogCommand;
use crate::commands::integrator::IntegratorCommand;
use crate::commands::quote::QuoteArgs;
use crate::config::AppConfig;
use solar_db::{Database, DbConfig};

#[derive(Debug, Parser)]
#[command(name = "solar-quote", version, about = "Solar energy system quoting")]
struct Cli {
    /// Config file (default: platform config dir/solar-quote.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the configured one
    #[arg(long = "db", global = true, env = "SOLAR_QUOTE_DB")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a system configuration and archive the quote
    Quote(QuoteArgs),

    /// Manage catalog items and breaker rules
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Manage integrator accounts
    #[command(subcommand)]
    Integrator(IntegratorCommand),

    /// Browse archived quotes
    #[command(subcommand)]
    Archive(ArchiveCommand),

    /// Load the stock catalog into an empty database
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    init_tracing(&config.log_filter);
    info!(database = %config.database_path.display(), "Starting solar-quote");

    config.ensure_data_dir()?;
    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.max_connections),
    )
    .await
    .context("opening database")?;

    let result = match cli.command {
        Command::Quote(args) => commands::quote::run(&db, &config, args).await,
        Command::Catalog(cmd) => commands::catalog::run(&db, cmd).await,
        Command::Integrator(cmd) => commands::integrator::run(&db, cmd).await,
        Command::Archive(cmd) => commands::archive::run(&db, &config, cmd).await,
        Command::Seed => commands::seed::run(&db).await,
    };

    db.close().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=solar=trace` - Show trace for solar crates only
/// - Default: the configured `log_filter`
///
/// Logs go to stderr so `--json` output stays clean.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
