//! # Catalog Commands
//!
//! Admin CRUD over the component catalog and breaker rules.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use clap::Subcommand;

use solar_core::catalog::{BreakerRule, CatalogItem, ComponentKind};
use solar_db::Database;

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List items of one kind (panel, inverter, mounting_structure, cable,
    /// surge_protector, circuit_breaker, ac_connector, inverter_support,
    /// credit_card_term)
    List {
        #[arg(value_parser = ComponentKind::from_str)]
        kind: ComponentKind,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print one item as JSON
    Show {
        #[arg(value_parser = ComponentKind::from_str)]
        kind: ComponentKind,
        id: String,
    },

    /// Delete one item
    Remove {
        #[arg(value_parser = ComponentKind::from_str)]
        kind: ComponentKind,
        id: String,
    },

    /// Upsert items from a JSON array of tagged catalog items
    Import { file: PathBuf },

    /// List breaker rules
    Rules,

    /// Add or replace a breaker rule
    RuleSet {
        /// Microinverter model name (e.g. "SIW100G M010 W00")
        #[arg(long)]
        model: String,

        /// Micros in series, 1 to 5
        #[arg(long)]
        micros: u32,

        /// Breaker model code (e.g. MDWP-C20-2)
        #[arg(long)]
        breaker: String,
    },

    /// Delete a breaker rule
    RuleRemove {
        #[arg(long)]
        model: String,

        #[arg(long)]
        micros: u32,
    },
}

pub async fn run(db: &Database, command: CatalogCommand) -> anyhow::Result<()> {
    let repo = db.catalog();

    match command {
        CatalogCommand::List { kind, json } => {
            let items = repo.list(kind).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("No {kind} items.");
            } else {
                for item in &items {
                    println!("{:<32}  {:>16}  {}", item.id(), list_price(item), item.name());
                }
            }
        }
        CatalogCommand::Show { kind, id } => {
            let item = repo
                .get(kind, &id)
                .await?
                .ok_or_else(|| anyhow!("{kind} not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        CatalogCommand::Remove { kind, id } => {
            repo.delete(kind, &id).await?;
            println!("Removed {kind} {id}");
        }
        CatalogCommand::Import { file } => {
            let items = read_items(&file)?;
            let count = repo.upsert_many(&items).await?;
            println!("Imported {count} items from {}", file.display());
        }
        CatalogCommand::Rules => {
            for rule in repo.list_breaker_rules().await? {
                println!(
                    "{:<24}  x{}  {}",
                    rule.inverter_model, rule.micros_in_series, rule.breaker_model_code
                );
            }
        }
        CatalogCommand::RuleSet {
            model,
            micros,
            breaker,
        } => {
            let rule = BreakerRule::new(model, micros, breaker);
            repo.upsert_breaker_rule(&rule).await?;
            println!(
                "{} x{} -> {}",
                rule.inverter_model, rule.micros_in_series, rule.breaker_model_code
            );
        }
        CatalogCommand::RuleRemove { model, micros } => {
            repo.delete_breaker_rule(&model, micros).await?;
            println!("Removed rule {model} x{micros}");
        }
    }

    Ok(())
}

fn read_items(file: &PathBuf) -> anyhow::Result<Vec<CatalogItem>> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", file.display()))
}

/// Price column for `catalog list`.
fn list_price(item: &CatalogItem) -> String {
    let price = match item {
        CatalogItem::Panel(p) => p.price.southeast,
        CatalogItem::Inverter(i) => i.price.southeast,
        CatalogItem::MountingStructure(s) => Some(s.price),
        CatalogItem::Cable(c) => Some(c.price),
        CatalogItem::SurgeProtector(s) => Some(s.price),
        CatalogItem::CircuitBreaker(b) => Some(b.price),
        CatalogItem::AcConnector(c) => Some(c.price),
        CatalogItem::InverterSupport(s) => Some(s.price),
        CatalogItem::CreditCardTerm(t) => {
            return format!("{:.2}%", t.cost_rate.percentage());
        }
    };
    price.map_or_else(|| "-".to_string(), |p| p.to_string())
}
