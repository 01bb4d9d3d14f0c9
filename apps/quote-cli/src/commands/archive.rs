//! # Archive Commands
//!
//! Read-only views over archived quotes.

use std::str::FromStr;

use anyhow::anyhow;
use clap::Subcommand;

use crate::config::AppConfig;
use solar_core::numbering::QuoteNumber;
use solar_core::render::render_summary;
use solar_core::types::ArchivedQuote;
use solar_db::Database;

#[derive(Debug, Subcommand)]
pub enum ArchiveCommand {
    /// List recent quotes, newest first
    List {
        /// Number of quotes (default: archive_page_size)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one quote by number (YYYY-NNNNN)
    Show {
        #[arg(value_parser = QuoteNumber::from_str)]
        number: QuoteNumber,

        /// Print the archived record as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(db: &Database, config: &AppConfig, command: ArchiveCommand) -> anyhow::Result<()> {
    match command {
        ArchiveCommand::List { limit } => {
            let quotes = recent_quotes(db, config, limit).await?;
            if quotes.is_empty() {
                println!("No archived quotes.");
            }
            for quote in quotes {
                println!(
                    "{}  {}  {:<24}  {:<10}  {:>16}  {}",
                    quote.quote_number,
                    quote.created_at.format("%Y-%m-%d %H:%M"),
                    quote.configuration.customer_name,
                    quote.produced_by_role.as_str(),
                    quote.result.final_discounted_price.to_string(),
                    quote.integrator_display_name.as_deref().unwrap_or("")
                );
            }
        }
        ArchiveCommand::Show { number, json } => {
            let quote = find_quote(db, &number).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("{}", config.company_name);
                println!(
                    "Issued {} ({})",
                    quote.created_at.format("%Y-%m-%d %H:%M UTC"),
                    quote.produced_by_role.as_str()
                );
                println!();
                print!("{}", render_summary(&quote.result, &quote.configuration));
            }
        }
    }

    Ok(())
}

/// Newest quotes first, `archive_page_size` of them unless `limit` is given.
async fn recent_quotes(
    db: &Database,
    config: &AppConfig,
    limit: Option<u32>,
) -> anyhow::Result<Vec<ArchivedQuote>> {
    Ok(db
        .archive()
        .list(limit.unwrap_or(config.archive_page_size))
        .await?)
}

async fn find_quote(db: &Database, number: &QuoteNumber) -> anyhow::Result<ArchivedQuote> {
    db.archive()
        .get_by_number(number)
        .await?
        .ok_or_else(|| anyhow!("Quote not found: {number}"))
}

// =============================================================================
// Unit Tests
// =============================================================================
