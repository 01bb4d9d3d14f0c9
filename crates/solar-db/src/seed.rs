//! # Catalog Seeding
//!
//! Loads the stock catalog from [`solar_core::defaults`] into an empty
//! database. Shared by the `seed` binary and `solar-quote seed`.

use tracing::{info, warn};

use crate::error::DbResult;
use crate::pool::Database;
use solar_core::defaults::default_catalog;

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Items and breaker rules written.
    Seeded { items: usize, rules: usize },
    /// The catalog already had items; nothing written.
    Skipped { existing: i64 },
}

/// Seeds the default catalog unless the catalog already has items.
pub async fn seed_default_catalog(db: &Database) -> DbResult<SeedOutcome> {
    let catalog_repo = db.catalog();

    let existing = catalog_repo.count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already populated, skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let catalog = default_catalog();
    let items = catalog_repo.upsert_many(&catalog.items()).await?;
    let rules = catalog_repo
        .upsert_breaker_rules(&catalog.breaker_rules)
        .await?;

    info!(items, rules, "Default catalog seeded");
    Ok(SeedOutcome::Seeded { items, rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    #[tokio::test]
    async fn test_seed_then_skip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let expected = default_catalog();

        let first = seed_default_catalog(&db).await.unwrap();
        assert_eq!(
            first,
            SeedOutcome::Seeded {
                items: expected.items().len(),
                rules: expected.breaker_rules.len(),
            }
        );

        let second = seed_default_catalog(&db).await.unwrap();
        assert_eq!(
            second,
            SeedOutcome::Skipped {
                existing: expected.items().len() as i64
            }
        );
    }

    #[tokio::test]
    async fn test_seeded_catalog_prices_reference_quote() {
        use solar_core::engine::price_configuration;
        use solar_core::numbering::QuoteNumber;
        use solar_core::types::{PaymentType, QuoteConfiguration, RoofType};

        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_default_catalog(&db).await.unwrap();
        let catalog = db.catalog().snapshot().await.unwrap();

        let config = QuoteConfiguration {
            customer_name: "Maria Souza".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            installation_city: "Campinas".to_string(),
            roof_type: RoofType::Ceramic,
            panel_id: "panel-ja-630".to_string(),
            panel_count: 10,
            microinverter_id: "inv-weg-siw100g-m010".to_string(),
            payment_type: PaymentType::Cash,
            credit_card_term_id: None,
        };
        let quote = price_configuration(&config, &catalog, None, QuoteNumber::new(2026, 1))
            .unwrap();
        assert_eq!(quote.total_component_cost.cents(), 2_535_430);
        assert_eq!(quote.final_discounted_price.cents(), 1_073_300);
    }
}
