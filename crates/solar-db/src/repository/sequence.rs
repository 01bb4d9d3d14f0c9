//! # Quote Sequence Repository
//!
//! Persists the `(year, last_sequence)` pair behind `YYYY-NNNNN` numbers.
//!
//! ```text
//! BEGIN
//!   SELECT year, last_sequence FROM quote_sequence WHERE id = 1
//!   next_quote_number(stored, current_year)      ← pure, solar-core
//!   UPSERT quote_sequence (1, year, sequence)
//! COMMIT
//! ```
//!
//! A number is consumed even when the quote it was issued for fails to
//! price, so the archive may show gaps.

use chrono::{Datelike, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use solar_core::numbering::{next_quote_number, QuoteNumber, QuoteSequence};

/// Repository for the single-row quote counter.
#[derive(Debug, Clone)]
pub struct QuoteSequenceRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct SequenceRow {
    year: i64,
    last_sequence: i64,
}

impl TryFrom<SequenceRow> for QuoteSequence {
    type Error = DbError;

    fn try_from(row: SequenceRow) -> Result<Self, Self::Error> {
        Ok(QuoteSequence {
            year: i32::try_from(row.year).map_err(|e| DbError::corrupt("quote sequence", e))?,
            last_sequence: u32::try_from(row.last_sequence)
                .map_err(|e| DbError::corrupt("quote sequence", e))?,
        })
    }
}

impl QuoteSequenceRepository {
    /// Creates a new QuoteSequenceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteSequenceRepository { pool }
    }

    /// The last issued state, if any number was ever issued.
    pub async fn current(&self) -> DbResult<Option<QuoteSequence>> {
        let row = sqlx::query_as::<_, SequenceRow>(
            "SELECT year, last_sequence FROM quote_sequence WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(QuoteSequence::try_from).transpose()
    }

    /// Issues the next number for the current UTC year.
    pub async fn next_number(&self) -> DbResult<QuoteNumber> {
        self.next_number_for_year(Utc::now().year()).await
    }

    /// Issues the next number for `year`.
    pub async fn next_number_for_year(&self, year: i32) -> DbResult<QuoteNumber> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, SequenceRow>(
            "SELECT year, last_sequence FROM quote_sequence WHERE id = 1",
        )
        .fetch_optional(&mut *tx)
        .await?
        .map(QuoteSequence::try_from)
        .transpose()?;

        let (next, number) = next_quote_number(stored, year);

        sqlx::query(
            r#"
            INSERT INTO quote_sequence (id, year, last_sequence)
            VALUES (1, ?1, ?2)
            ON CONFLICT (id) DO UPDATE SET
                year = excluded.year,
                last_sequence = excluded.last_sequence
            "#,
        )
        .bind(i64::from(next.year))
        .bind(i64::from(next.last_sequence))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(quote_number = %number, "Quote number issued");
        Ok(number)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
