//! # Quote Command
//!
//! ```text
//! QuoteArgs ──► QuoteConfiguration ──► validate
//!                                         │
//!   --integrator/--secret ──► authenticate (argon2)
//!                                         │
//!   db.catalog().snapshot() ──────────────┤
//!   db.quote_sequence().next_number() ────┤
//!                                         ▼
//!                          price_configuration (pure)
//!                                         │
//!                                         ▼
//!                          db.archive().append() ──► summary | JSON
//! ```

use std::str::FromStr;

use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::Args;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use solar_core::engine::price_configuration;
use solar_core::render::render_summary;
use solar_core::types::{ArchivedQuote, PaymentType, QuoteConfiguration, RoofType, UserRole};
use solar_core::validation::validate_quote_configuration;
use solar_db::Database;

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Customer name
    #[arg(long = "name")]
    pub customer_name: String,

    /// Customer e-mail
    #[arg(long)]
    pub email: String,

    /// Customer phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Installation city
    #[arg(long = "city")]
    pub installation_city: String,

    /// Roof type: ceramic, metal, slab, fiber_cement, fiber_cement_wood,
    /// fiber_cement_metal, other
    #[arg(long = "roof", value_parser = RoofType::from_str)]
    pub roof_type: RoofType,

    /// Panel catalog id
    #[arg(long = "panel")]
    pub panel_id: String,

    /// Number of panels
    #[arg(long = "panels")]
    pub panel_count: u32,

    /// Microinverter catalog id
    #[arg(long = "micro")]
    pub microinverter_id: String,

    /// cash or card (default: card when --card-term is given)
    #[arg(long, value_parser = PaymentType::from_str)]
    pub payment: Option<PaymentType>,

    /// Credit card term id (e.g. cc-02)
    #[arg(long)]
    pub card_term: Option<String>,

    /// Price as this integrator
    #[arg(long, requires = "secret")]
    pub integrator: Option<String>,

    /// Integrator secret
    #[arg(long, env = "SOLAR_QUOTE_INTEGRATOR_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Print the archived record as JSON instead of the summary
    #[arg(long)]
    pub json: bool,
}

impl QuoteArgs {
    fn configuration(&self) -> QuoteConfiguration {
        let payment_type = self.payment.unwrap_or(if self.card_term.is_some() {
            PaymentType::Card
        } else {
            PaymentType::Cash
        });

        QuoteConfiguration {
            customer_name: self.customer_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.clone(),
            installation_city: self.installation_city.trim().to_string(),
            roof_type: self.roof_type,
            panel_id: self.panel_id.clone(),
            panel_count: self.panel_count,
            microinverter_id: self.microinverter_id.clone(),
            payment_type,
            credit_card_term_id: self.card_term.clone(),
        }
    }
}

pub async fn run(db: &Database, config: &AppConfig, args: QuoteArgs) -> anyhow::Result<()> {
    let json = args.json;
    let archived = create_quote(db, &args).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&archived)?);
    } else {
        println!("{}", config.company_name);
        println!();
        print!("{}", render_summary(&archived.result, &archived.configuration));
    }
    Ok(())
}

/// Prices, numbers and archives one quote.
pub async fn create_quote(db: &Database, args: &QuoteArgs) -> anyhow::Result<ArchivedQuote> {
    let configuration = args.configuration();
    validate_quote_configuration(&configuration)?;

    let integrator = match (&args.integrator, &args.secret) {
        (Some(username), Some(secret)) => Some(
            db.integrators()
                .authenticate(username, secret)
                .await?
                .ok_or_else(|| anyhow!("invalid integrator credentials for '{username}'"))?,
        ),
        _ => None,
    };

    let catalog = db.catalog().snapshot().await.context("loading catalog")?;
    let quote_number = db.quote_sequence().next_number().await?;

    let result = price_configuration(&configuration, &catalog, integrator.as_ref(), quote_number)?;
    for warning in &result.warnings {
        warn!(quote_number = %result.quote_number, "{warning}");
    }

    let archived = ArchivedQuote {
        id: Uuid::new_v4().to_string(),
        quote_number: result.quote_number.clone(),
        created_at: Utc::now(),
        configuration,
        result,
        produced_by_role: if integrator.is_some() {
            UserRole::Integrator
        } else {
            UserRole::Customer
        },
        integrator_id: integrator.as_ref().map(|i| i.id.clone()),
        integrator_display_name: integrator.as_ref().map(|i| i.label().to_string()),
    };
    db.archive().append(&archived).await?;

    info!(
        quote_number = %archived.quote_number,
        total = %archived.result.final_discounted_price,
        "Quote created"
    );
    Ok(archived)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use solar_core::types::Factor;
    use solar_db::{seed_default_catalog, DbConfig};

    async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_default_catalog(&db).await.unwrap();
        db
    }

    fn args() -> QuoteArgs {
        QuoteArgs {
            customer_name: " Maria Souza ".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            installation_city: "Campinas".to_string(),
            roof_type: RoofType::Ceramic,
            panel_id: "panel-ja-630".to_string(),
            panel_count: 10,
            microinverter_id: "inv-weg-siw100g-m010".to_string(),
            payment: None,
            card_term: None,
            integrator: None,
            secret: None,
            json: false,
        }
    }

    #[tokio::test]
    async fn test_customer_quote_is_archived() {
        let db = seeded_db().await;
        let archived = create_quote(&db, &args()).await.unwrap();

        assert_eq!(archived.configuration.customer_name, "Maria Souza");
        assert_eq!(archived.produced_by_role, UserRole::Customer);
        assert_eq!(archived.result.final_discounted_price.cents(), 1_073_300);
        assert!(archived.result.payment.is_none());

        let stored = db
            .archive()
            .get_by_number(&archived.quote_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, archived.id);
    }

    #[tokio::test]
    async fn test_card_term_implies_card_payment() {
        let db = seeded_db().await;
        let mut a = args();
        a.card_term = Some("cc-01".to_string());
        let archived = create_quote(&db, &a).await.unwrap();

        assert_eq!(archived.configuration.payment_type, PaymentType::Card);
        let payment = archived.result.payment.unwrap();
        assert_eq!(payment.financing_cost.cents(), 31_200);
        assert_eq!(payment.total_with_financing.cents(), 1_104_500);
    }

    #[tokio::test]
    async fn test_integrator_quote() {
        let db = seeded_db().await;
        db.integrators()
            .create("solartec", "s3cret-pass", Some("SolarTec"), Factor::from_ppm(800_000))
            .await
            .unwrap();

        let mut a = args();
        a.integrator = Some("solartec".to_string());
        a.secret = Some("s3cret-pass".to_string());
        let archived = create_quote(&db, &a).await.unwrap();

        assert_eq!(archived.produced_by_role, UserRole::Integrator);
        assert_eq!(archived.integrator_display_name.as_deref(), Some("SolarTec"));
        assert_eq!(archived.result.final_discounted_price.cents(), 1_034_600);
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected_without_archiving() {
        let db = seeded_db().await;
        db.integrators()
            .create("solartec", "s3cret-pass", None, Factor::from_ppm(800_000))
            .await
            .unwrap();

        let mut a = args();
        a.integrator = Some("solartec".to_string());
        a.secret = Some("wrong-pass".to_string());
        assert!(create_quote(&db, &a).await.is_err());
        assert_eq!(db.archive().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_panel_fails() {
        let db = seeded_db().await;
        let mut a = args();
        a.panel_id = "panel-nope".to_string();
        let err = create_quote(&db, &a).await.unwrap_err();
        assert_eq!(err.to_string(), "panel details not found");
        assert_eq!(db.archive().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_panels_reports_engine_message() {
        let db = seeded_db().await;
        let mut a = args();
        a.panel_count = 0;
        let err = create_quote(&db, &a).await.unwrap_err();
        assert_eq!(err.to_string(), "panel count must be greater than zero");
        assert_eq!(db.archive().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_large_installation_is_quoted() {
        let db = seeded_db().await;
        let mut a = args();
        a.panel_count = 1_000;
        let archived = create_quote(&db, &a).await.unwrap();

        assert_eq!(archived.configuration.panel_count, 1_000);
        let total: i64 = archived
            .result
            .line_items
            .iter()
            .map(|item| item.total_price.cents())
            .sum();
        assert_eq!(archived.result.total_component_cost.cents(), total);
    }

    #[tokio::test]
    async fn test_sequential_numbers() {
        let db = seeded_db().await;
        let first = create_quote(&db, &args()).await.unwrap();
        let second = create_quote(&db, &args()).await.unwrap();
        assert_eq!(
            second.quote_number.sequence(),
            first.quote_number.sequence().map(|n| n + 1)
        );
    }
}
