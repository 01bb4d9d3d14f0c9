//! # Catalog Repository
//!
//! CRUD over catalog items and breaker rules, plus assembly of the
//! immutable [`Catalog`] snapshot the engine prices against.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog_items                                                          │
//! │  ┌────────────┬──────────────────────┬──────────┬──────────────────┐   │
//! │  │ kind       │ id                   │ position │ payload (JSON)   │   │
//! │  ├────────────┼──────────────────────┼──────────┼──────────────────┤   │
//! │  │ panel      │ panel-byd-535        │ 1        │ {"kind":"panel", │   │
//! │  │ panel      │ panel-tongwei-610    │ 2        │  "item":{...}}   │   │
//! │  │ cable      │ cable-dc-6mm-black   │ 1        │ ...              │   │
//! │  └────────────┴──────────────────────┴──────────┴──────────────────┘   │
//! │                                                                         │
//! │  snapshot() ── ORDER BY kind, position ──► Catalog::from_parts()       │
//! │                                                                         │
//! │  Position is assigned on first insert and kept on update, so the       │
//! │  engine's "first entry of this kind" fallbacks stay stable.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use solar_core::catalog::{BreakerRule, Catalog, CatalogItem, ComponentKind};
use solar_core::validation::{validate_breaker_rule, validate_catalog_item};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// repo.upsert(&CatalogItem::Panel(panel)).await?;
/// let panels = repo.list(ComponentKind::Panel).await?;
/// let catalog = repo.snapshot().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct BreakerRuleRow {
    inverter_model: String,
    micros_in_series: i64,
    breaker_model_code: String,
}

impl TryFrom<BreakerRuleRow> for BreakerRule {
    type Error = DbError;

    fn try_from(row: BreakerRuleRow) -> Result<Self, Self::Error> {
        let micros = u32::try_from(row.micros_in_series)
            .map_err(|e| DbError::corrupt("breaker rule", e))?;
        Ok(BreakerRule::new(row.inverter_model, micros, row.breaker_model_code))
    }
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Inserts or replaces an item by `(kind, id)`.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - Item rejected at the boundary; nothing written
    pub async fn upsert(&self, item: &CatalogItem) -> DbResult<()> {
        validate_catalog_item(item)?;
        let mut conn = self.pool.acquire().await?;
        write_item(&mut conn, item).await
    }

    /// Upserts a batch of items in one transaction.
    ///
    /// Every item is validated before the transaction opens; one bad item
    /// rejects the whole batch.
    pub async fn upsert_many(&self, items: &[CatalogItem]) -> DbResult<usize> {
        for item in items {
            validate_catalog_item(item)?;
        }

        let mut tx = self.pool.begin().await?;
        for item in items {
            write_item(&mut tx, item).await?;
        }
        tx.commit().await?;

        info!(count = items.len(), "Catalog items imported");
        Ok(items.len())
    }

    /// Gets one item.
    ///
    /// ## Returns
    /// * `Ok(Some(CatalogItem))` - Item found
    /// * `Ok(None)` - No item of that kind with that id
    pub async fn get(&self, kind: ComponentKind, id: &str) -> DbResult<Option<CatalogItem>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM catalog_items WHERE kind = ?1 AND id = ?2")
                .bind(kind.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        payload.map(|p| decode_item(&p)).transpose()
    }

    /// Lists every item of a kind in catalog order.
    pub async fn list(&self, kind: ComponentKind) -> DbResult<Vec<CatalogItem>> {
        let payloads: Vec<String> = sqlx::query_scalar(
            "SELECT payload FROM catalog_items WHERE kind = ?1 ORDER BY position, id",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        payloads.iter().map(|p| decode_item(p)).collect()
    }

    /// Deletes an item.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Nothing matched
    pub async fn delete(&self, kind: ComponentKind, id: &str) -> DbResult<()> {
        debug!(kind = %kind, id = %id, "Deleting catalog item");

        let result = sqlx::query("DELETE FROM catalog_items WHERE kind = ?1 AND id = ?2")
            .bind(kind.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(kind.as_str(), id));
        }
        Ok(())
    }

    /// Counts all stored items (every kind).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Breaker Rules
    // =========================================================================

    /// Inserts or replaces the rule for `(inverter_model, micros_in_series)`.
    pub async fn upsert_breaker_rule(&self, rule: &BreakerRule) -> DbResult<()> {
        validate_breaker_rule(rule)?;
        let mut conn = self.pool.acquire().await?;
        write_rule(&mut conn, rule).await
    }

    /// Upserts a batch of rules in one transaction.
    pub async fn upsert_breaker_rules(&self, rules: &[BreakerRule]) -> DbResult<usize> {
        for rule in rules {
            validate_breaker_rule(rule)?;
        }

        let mut tx = self.pool.begin().await?;
        for rule in rules {
            write_rule(&mut tx, rule).await?;
        }
        tx.commit().await?;
        Ok(rules.len())
    }

    pub async fn delete_breaker_rule(&self, inverter_model: &str, micros: u32) -> DbResult<()> {
        let result = sqlx::query(
            "DELETE FROM breaker_rules WHERE inverter_model = ?1 AND micros_in_series = ?2",
        )
        .bind(inverter_model)
        .bind(i64::from(micros))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Breaker rule",
                format!("{inverter_model} x{micros}"),
            ));
        }
        Ok(())
    }

    pub async fn list_breaker_rules(&self) -> DbResult<Vec<BreakerRule>> {
        let mut conn = self.pool.acquire().await?;
        read_rules(&mut conn).await
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Assembles the immutable catalog value for one pricing run.
    ///
    /// Items and rules are read in one transaction, so an admin edit cannot
    /// land between the two reads.
    pub async fn snapshot(&self) -> DbResult<Catalog> {
        let mut tx = self.pool.begin().await?;

        let payloads: Vec<String> =
            sqlx::query_scalar("SELECT payload FROM catalog_items ORDER BY kind, position, id")
                .fetch_all(&mut *tx)
                .await?;
        let rules = read_rules(&mut tx).await?;

        tx.commit().await?;

        let items = payloads
            .iter()
            .map(|p| decode_item(p))
            .collect::<DbResult<Vec<_>>>()?;

        debug!(items = items.len(), rules = rules.len(), "Catalog snapshot loaded");
        Ok(Catalog::from_parts(items, rules)?)
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn write_item(conn: &mut SqliteConnection, item: &CatalogItem) -> DbResult<()> {
    debug!(kind = %item.kind(), id = %item.id(), "Upserting catalog item");

    let payload = serde_json::to_string(item)?;
    let kind = item.kind().as_str();

    // New rows go to the end of their kind; updates keep their position.
    sqlx::query(
        r#"
        INSERT INTO catalog_items (kind, id, name, position, payload, updated_at)
        VALUES (
            ?1, ?2, ?3,
            COALESCE((SELECT MAX(position) FROM catalog_items WHERE kind = ?1), 0) + 1,
            ?4, ?5
        )
        ON CONFLICT (kind, id) DO UPDATE SET
            name = excluded.name,
            payload = excluded.payload,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(kind)
    .bind(item.id())
    .bind(item.name())
    .bind(payload)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn write_rule(conn: &mut SqliteConnection, rule: &BreakerRule) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO breaker_rules (inverter_model, micros_in_series, breaker_model_code)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (inverter_model, micros_in_series) DO UPDATE SET
            breaker_model_code = excluded.breaker_model_code
        "#,
    )
    .bind(&rule.inverter_model)
    .bind(i64::from(rule.micros_in_series))
    .bind(&rule.breaker_model_code)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn read_rules(conn: &mut SqliteConnection) -> DbResult<Vec<BreakerRule>> {
    let rows = sqlx::query_as::<_, BreakerRuleRow>(
        r#"
        SELECT inverter_model, micros_in_series, breaker_model_code
        FROM breaker_rules
        ORDER BY inverter_model, micros_in_series
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(BreakerRule::try_from).collect()
}

fn decode_item(payload: &str) -> DbResult<CatalogItem> {
    Ok(serde_json::from_str(payload)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use solar_core::catalog::{AcConnector, CreditCardTerm};
    use solar_core::defaults::{default_breaker_rules, default_catalog, default_panels};
    use solar_core::types::Rate;
    use solar_core::{Money, ValidationError};

    async fn repo() -> CatalogRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalog()
    }

    fn connector(id: &str, cents: i64) -> CatalogItem {
        CatalogItem::AcConnector(AcConnector {
            id: id.to_string(),
            name: format!("Connector {id}"),
            part_code: None,
            price: Money::from_cents(cents),
            compatibility_note: None,
        })
    }

    #[tokio::test]
    async fn test_upsert_get_and_update() {
        let repo = repo().await;
        repo.upsert(&connector("ac-1", 10_000)).await.unwrap();

        let loaded = repo.get(ComponentKind::AcConnector, "ac-1").await.unwrap();
        assert_eq!(loaded, Some(connector("ac-1", 10_000)));

        repo.upsert(&connector("ac-1", 12_000)).await.unwrap();
        let loaded = repo.get(ComponentKind::AcConnector, "ac-1").await.unwrap();
        assert_eq!(loaded, Some(connector("ac-1", 12_000)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_wrong_kind_is_none() {
        let repo = repo().await;
        repo.upsert(&connector("ac-1", 10_000)).await.unwrap();
        let loaded = repo.get(ComponentKind::Cable, "ac-1").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let repo = repo().await;
        repo.upsert(&connector("ac-b", 1_000)).await.unwrap();
        repo.upsert(&connector("ac-a", 1_000)).await.unwrap();
        repo.upsert(&connector("ac-b", 2_000)).await.unwrap();

        let ids: Vec<String> = repo
            .list(ComponentKind::AcConnector)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id().to_string())
            .collect();
        assert_eq!(ids, vec!["ac-b", "ac-a"]);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_item() {
        let repo = repo().await;
        let err = repo.upsert(&connector("ac-free", 0)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustBePositive { .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_many_is_all_or_nothing() {
        let repo = repo().await;
        let items = vec![connector("ac-1", 1_000), connector("ac-2", -5)];
        assert!(repo.upsert_many(&items).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        repo.upsert(&connector("ac-1", 1_000)).await.unwrap();
        repo.delete(ComponentKind::AcConnector, "ac-1").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);

        let err = repo
            .delete(ComponentKind::AcConnector, "ac-1")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_card_term_rate_validated() {
        let repo = repo().await;
        let term = CatalogItem::CreditCardTerm(CreditCardTerm {
            id: "cc-x".to_string(),
            code: "CCX".to_string(),
            description: "30 days".to_string(),
            cost_rate: Rate::from_bps(10_001),
        });
        assert!(repo.upsert(&term).await.is_err());
    }

    #[tokio::test]
    async fn test_breaker_rules_replace_on_same_key() {
        let repo = repo().await;
        repo.upsert_breaker_rule(&BreakerRule::new("M010", 1, "C10"))
            .await
            .unwrap();
        repo.upsert_breaker_rule(&BreakerRule::new("M010", 1, "C16"))
            .await
            .unwrap();

        let rules = repo.list_breaker_rules().await.unwrap();
        assert_eq!(rules, vec![BreakerRule::new("M010", 1, "C16")]);

        repo.delete_breaker_rule("M010", 1).await.unwrap();
        assert!(repo.list_breaker_rules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_breaker_rule_series_range() {
        let repo = repo().await;
        let err = repo
            .upsert_breaker_rule(&BreakerRule::new("M010", 6, "C40"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_snapshot_matches_default_catalog() {
        let repo = repo().await;
        let catalog = default_catalog();
        repo.upsert_many(&catalog.items()).await.unwrap();
        repo.upsert_breaker_rules(&default_breaker_rules())
            .await
            .unwrap();

        let snapshot = repo.snapshot().await.unwrap();
        assert_eq!(snapshot.panels, default_panels());
        assert_eq!(snapshot.inverters, catalog.inverters);
        assert_eq!(snapshot.card_terms, catalog.card_terms);
        assert_eq!(snapshot.breaker_rules.len(), catalog.breaker_rules.len());
    }

    #[tokio::test]
    async fn test_snapshot_releases_its_transaction() {
        // in-memory pool has one connection: a leaked transaction would
        // block the writes below
        let repo = repo().await;
        repo.upsert(&connector("ac-1", 9_900)).await.unwrap();
        repo.upsert_breaker_rules(&default_breaker_rules())
            .await
            .unwrap();

        let first = repo.snapshot().await.unwrap();
        assert_eq!(first.ac_connectors.len(), 1);

        repo.upsert(&connector("ac-2", 12_000)).await.unwrap();
        let rules = default_breaker_rules();
        let rule = &rules[0];
        repo.delete_breaker_rule(&rule.inverter_model, rule.micros_in_series)
            .await
            .unwrap();

        let second = repo.snapshot().await.unwrap();
        assert_eq!(second.ac_connectors.len(), 2);
        assert_eq!(second.breaker_rules.len(), first.breaker_rules.len() - 1);
        assert_eq!(second.breaker_rules, repo.list_breaker_rules().await.unwrap());
    }
}
