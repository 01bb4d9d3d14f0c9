//! # Quote Archive Repository
//!
//! Append-only storage of produced quotes.
//!
//! ## Write Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  archived_quotes                                                        │
//! │                                                                         │
//! │  id │ quote_number │ created_at │ configuration │ result │ role │ ...   │
//! │     │  2026-00001  │  RFC 3339  │     JSON      │  JSON  │      │       │
//! │                                                                         │
//! │  append() ✅      list() ✅      get_by_number() ✅      count() ✅      │
//! │  update   ❌      delete ❌   (a quote is a record of what was offered) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use solar_core::numbering::QuoteNumber;
use solar_core::types::{ArchivedQuote, UserRole};

/// Repository for the quote archive.
#[derive(Debug, Clone)]
pub struct QuoteArchiveRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct ArchivedQuoteRow {
    id: String,
    quote_number: String,
    created_at: String,
    configuration: String,
    result: String,
    produced_by_role: String,
    integrator_id: Option<String>,
    integrator_display_name: Option<String>,
}

impl TryFrom<ArchivedQuoteRow> for ArchivedQuote {
    type Error = DbError;

    fn try_from(row: ArchivedQuoteRow) -> Result<Self, Self::Error> {
        let quote_number = QuoteNumber::from_str(&row.quote_number)
            .map_err(|e| DbError::corrupt("archived quote", e))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| DbError::corrupt("archived quote", e))?
            .with_timezone(&Utc);
        let produced_by_role = UserRole::from_str(&row.produced_by_role)
            .map_err(|e| DbError::corrupt("archived quote", e))?;

        Ok(ArchivedQuote {
            id: row.id,
            quote_number,
            created_at,
            configuration: serde_json::from_str(&row.configuration)?,
            result: serde_json::from_str(&row.result)?,
            produced_by_role,
            integrator_id: row.integrator_id,
            integrator_display_name: row.integrator_display_name,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, quote_number, created_at, configuration, result,
           produced_by_role, integrator_id, integrator_display_name
    FROM archived_quotes
"#;

impl QuoteArchiveRepository {
    /// Creates a new QuoteArchiveRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteArchiveRepository { pool }
    }

    /// Stores a quote.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The quote number was archived before
    pub async fn append(&self, quote: &ArchivedQuote) -> DbResult<()> {
        debug!(quote_number = %quote.quote_number, "Archiving quote");

        let configuration = serde_json::to_string(&quote.configuration)?;
        let result = serde_json::to_string(&quote.result)?;

        sqlx::query(
            r#"
            INSERT INTO archived_quotes (
                id, quote_number, created_at, configuration, result,
                produced_by_role, integrator_id, integrator_display_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&quote.id)
        .bind(quote.quote_number.as_str())
        .bind(quote.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
        .bind(configuration)
        .bind(result)
        .bind(quote.produced_by_role.as_str())
        .bind(&quote.integrator_id)
        .bind(&quote.integrator_display_name)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                DbError::duplicate("quote number", quote.quote_number.as_str())
            }
            other => other,
        })?;

        info!(
            quote_number = %quote.quote_number,
            role = quote.produced_by_role.as_str(),
            final_price = %quote.result.final_discounted_price,
            "Quote archived"
        );
        Ok(())
    }

    /// Lists the most recent quotes, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<ArchivedQuote>> {
        let rows = sqlx::query_as::<_, ArchivedQuoteRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, quote_number DESC LIMIT ?1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ArchivedQuote::try_from).collect()
    }

    pub async fn get_by_number(&self, number: &QuoteNumber) -> DbResult<Option<ArchivedQuote>> {
        let row = sqlx::query_as::<_, ArchivedQuoteRow>(&format!(
            "{SELECT_COLUMNS} WHERE quote_number = ?1"
        ))
        .bind(number.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ArchivedQuote::try_from).transpose()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM archived_quotes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use solar_core::defaults::default_catalog;
    use solar_core::engine::price_configuration;
    use solar_core::types::{PaymentType, QuoteConfiguration, RoofType};

    fn config() -> QuoteConfiguration {
        QuoteConfiguration {
            customer_name: "Maria Souza".to_string(),
            email: "maria@example.com".to_string(),
            phone: None,
            installation_city: "Campinas".to_string(),
            roof_type: RoofType::Ceramic,
            panel_id: "panel-ja-630".to_string(),
            panel_count: 10,
            microinverter_id: "inv-weg-siw100g-m010".to_string(),
            payment_type: PaymentType::Card,
            credit_card_term_id: Some("cc-02".to_string()),
        }
    }

    fn archived(seq: u32, minutes: i64) -> ArchivedQuote {
        let number = QuoteNumber::new(2026, seq);
        let result = price_configuration(&config(), &default_catalog(), None, number.clone())
            .unwrap();
        ArchivedQuote {
            id: format!("q-{seq}"),
            quote_number: number,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
            configuration: config(),
            result,
            produced_by_role: UserRole::Customer,
            integrator_id: None,
            integrator_display_name: None,
        }
    }

    async fn repo() -> QuoteArchiveRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().archive()
    }

    #[tokio::test]
    async fn test_append_and_get_round_trip() {
        let repo = repo().await;
        let quote = archived(1, 0);
        repo.append(&quote).await.unwrap();

        let loaded = repo
            .get_by_number(&QuoteNumber::new(2026, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, quote);
        assert_eq!(loaded.result.final_discounted_price.cents(), 1_073_300);
        assert_eq!(
            loaded.result.payment.as_ref().map(|p| p.installment_value.cents()),
            Some(558_062)
        );
    }

    #[tokio::test]
    async fn test_list_newest_first_with_limit() {
        let repo = repo().await;
        repo.append(&archived(1, 0)).await.unwrap();
        repo.append(&archived(2, 5)).await.unwrap();
        repo.append(&archived(3, 10)).await.unwrap();

        let numbers: Vec<String> = repo
            .list(2)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.quote_number.to_string())
            .collect();
        assert_eq!(numbers, vec!["2026-00003", "2026-00002"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_quote_number_is_unique() {
        let repo = repo().await;
        repo.append(&archived(1, 0)).await.unwrap();

        let mut again = archived(1, 1);
        again.id = "q-other".to_string();
        let err = repo.append(&again).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_number_is_none() {
        let repo = repo().await;
        let loaded = repo.get_by_number(&QuoteNumber::new(2026, 99)).await.unwrap();
        assert!(loaded.is_none());
    }
}
