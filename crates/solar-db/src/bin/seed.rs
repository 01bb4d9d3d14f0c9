//! # Seed Data Loader
//!
//! Loads the stock catalog into a database for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./solar_dev.db (default)
//! cargo run -p solar-db --bin seed
//!
//! # Specify database path
//! cargo run -p solar-db --bin seed -- --db ./data/solar-quote.db
//! ```
//!
//! An already populated catalog is left untouched.

use std::env;

use solar_db::{seed_default_catalog, Database, DbConfig, SeedOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./solar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Solar Quote Seed Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./solar_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Solar Quote Seed Loader");
    println!("=======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    match seed_default_catalog(&db).await? {
        SeedOutcome::Seeded { items, rules } => {
            println!("✓ Seeded {} catalog items and {} breaker rules", items, rules);
        }
        SeedOutcome::Skipped { existing } => {
            println!("⚠ Catalog already has {} items", existing);
            println!("  Skipping seed to avoid overwriting edits.");
            println!("  Delete the database file to regenerate.");
        }
    }

    db.close().await;
    Ok(())
}
