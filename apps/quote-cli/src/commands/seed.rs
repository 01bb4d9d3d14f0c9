//! # Seed Command

use solar_db::{seed_default_catalog, Database, SeedOutcome};

pub async fn run(db: &Database) -> anyhow::Result<()> {
    match seed_default_catalog(db).await? {
        SeedOutcome::Seeded { items, rules } => {
            println!("Seeded {items} catalog items and {rules} breaker rules");
        }
        SeedOutcome::Skipped { existing } => {
            println!("Catalog already has {existing} items, nothing seeded");
        }
    }
    Ok(())
}
