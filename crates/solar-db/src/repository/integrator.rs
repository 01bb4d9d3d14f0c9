//! # Integrator Repository
//!
//! Installer partners and their negotiated discount multiplier.
//!
//! ## Credential Flow
//! ```text
//! create(username, secret, display, secondary)
//!      │
//!      ├──► validate username / secret / display name
//!      ├──► argon2(secret, random salt) ──► PHC string stored
//!      └──► PRIMARY × secondary ──────────► final multiplier stored
//!
//! authenticate(username, secret)
//!      │
//!      └──► load row ──► argon2 verify ──► Some(profile) | None
//!
//! update(id, secret?, display?, secondary?)
//!      │
//!      └──► re-hash only a new secret, re-derive only a new multiplier
//! ```
//!
//! The plain secret is never written anywhere.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use solar_core::catalog::IntegratorProfile;
use solar_core::discount::integrator_multiplier;
use solar_core::types::{Factor, Multiplier};
use solar_core::validation::{validate_name, validate_secret, validate_username};
use solar_core::ValidationError;

/// Repository for integrator accounts.
#[derive(Debug, Clone)]
pub struct IntegratorRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct IntegratorRow {
    id: String,
    username: String,
    credential_hash: String,
    display_name: Option<String>,
    final_discount_multiplier: i64,
}

impl TryFrom<IntegratorRow> for IntegratorProfile {
    type Error = DbError;

    fn try_from(row: IntegratorRow) -> Result<Self, Self::Error> {
        let ppt = u64::try_from(row.final_discount_multiplier)
            .map_err(|e| DbError::corrupt("integrator", e))?;
        Ok(IntegratorProfile {
            id: row.id,
            username: row.username,
            credential_hash: row.credential_hash,
            display_name: row.display_name,
            final_discount_multiplier: Multiplier::from_ppt(ppt),
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, username, credential_hash, display_name, final_discount_multiplier FROM integrators";

impl IntegratorRepository {
    /// Creates a new IntegratorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IntegratorRepository { pool }
    }

    /// Registers an integrator.
    ///
    /// ## Arguments
    /// * `secondary` - Negotiated secondary factor, in `(0, 1]`
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Username already taken
    pub async fn create(
        &self,
        username: &str,
        secret: &str,
        display_name: Option<&str>,
        secondary: Factor,
    ) -> DbResult<IntegratorProfile> {
        validate_username(username)?;
        validate_secret(secret)?;
        if let Some(name) = display_name {
            validate_name("display name", name)?;
        }
        validate_secondary(secondary)?;

        let profile = IntegratorProfile {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            credential_hash: hash_secret(secret)?,
            display_name: display_name.map(str::to_string),
            final_discount_multiplier: integrator_multiplier(secondary),
        };

        debug!(username = %profile.username, "Creating integrator");

        let ppt = multiplier_ppt(profile.final_discount_multiplier)?;

        sqlx::query(
            r#"
            INSERT INTO integrators (
                id, username, credential_hash, display_name,
                final_discount_multiplier, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.username)
        .bind(&profile.credential_hash)
        .bind(&profile.display_name)
        .bind(ppt)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("username", username),
            other => other,
        })?;

        info!(
            username = %profile.username,
            multiplier = %profile.final_discount_multiplier,
            "Integrator registered"
        );
        Ok(profile)
    }

    /// Checks a username/secret pair.
    ///
    /// ## Returns
    /// * `Ok(Some(profile))` - Credentials match
    /// * `Ok(None)` - Unknown username or wrong secret
    pub async fn authenticate(
        &self,
        username: &str,
        secret: &str,
    ) -> DbResult<Option<IntegratorProfile>> {
        let Some(profile) = self.get_by_username(username).await? else {
            debug!(username = %username, "Unknown integrator");
            return Ok(None);
        };

        if verify_secret(secret, &profile.credential_hash) {
            Ok(Some(profile))
        } else {
            warn!(username = %username, "Integrator authentication failed");
            Ok(None)
        }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<IntegratorProfile>> {
        let row = sqlx::query_as::<_, IntegratorRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(IntegratorProfile::try_from).transpose()
    }

    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<IntegratorProfile>> {
        let row =
            sqlx::query_as::<_, IntegratorRow>(&format!("{SELECT_COLUMNS} WHERE username = ?1"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        row.map(IntegratorProfile::try_from).transpose()
    }

    /// Lists integrators by username.
    pub async fn list(&self) -> DbResult<Vec<IntegratorProfile>> {
        let rows = sqlx::query_as::<_, IntegratorRow>(&format!("{SELECT_COLUMNS} ORDER BY username"))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(IntegratorProfile::try_from).collect()
    }

    /// Edits an integrator in place, keeping its id.
    ///
    /// Each `None` leaves that field unchanged: an omitted secret keeps the
    /// current hash, an omitted `secondary` keeps the stored multiplier.
    /// A new `secondary` is turned into `PRIMARY × secondary` like in
    /// [`create`](Self::create).
    pub async fn update(
        &self,
        id: &str,
        secret: Option<&str>,
        display_name: Option<&str>,
        secondary: Option<Factor>,
    ) -> DbResult<IntegratorProfile> {
        if let Some(secret) = secret {
            validate_secret(secret)?;
        }
        if let Some(name) = display_name {
            validate_name("display name", name)?;
        }
        if let Some(factor) = secondary {
            validate_secondary(factor)?;
        }

        let mut profile = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Integrator", id))?;

        debug!(username = %profile.username, "Updating integrator");

        if let Some(secret) = secret {
            profile.credential_hash = hash_secret(secret)?;
        }
        if let Some(name) = display_name {
            profile.display_name = Some(name.to_string());
        }
        if let Some(factor) = secondary {
            profile.final_discount_multiplier = integrator_multiplier(factor);
        }
        let ppt = multiplier_ppt(profile.final_discount_multiplier)?;

        let result = sqlx::query(
            r#"
            UPDATE integrators SET
                credential_hash = ?2,
                display_name = ?3,
                final_discount_multiplier = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.credential_hash)
        .bind(&profile.display_name)
        .bind(ppt)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Integrator", id));
        }

        info!(
            username = %profile.username,
            multiplier = %profile.final_discount_multiplier,
            secret_changed = secret.is_some(),
            "Integrator updated"
        );
        Ok(profile)
    }

    /// Deletes an integrator. Archived quotes keep their denormalized name.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM integrators WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Integrator", id));
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// A secondary factor must lie in `(0, 1]`.
fn validate_secondary(secondary: Factor) -> DbResult<()> {
    if secondary.ppm() == 0 || secondary > Factor::ONE {
        return Err(ValidationError::OutOfRange {
            field: "secondary factor (ppm)".to_string(),
            min: 1,
            max: Factor::ONE.ppm() as i64,
        }
        .into());
    }
    Ok(())
}

fn multiplier_ppt(multiplier: Multiplier) -> DbResult<i64> {
    i64::try_from(multiplier.ppt()).map_err(|e| DbError::Internal(e.to_string()))
}

/// Hash a secret for storage.
fn hash_secret(secret: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| DbError::Credential(format!("Failed to hash secret: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a secret against its hash.
fn verify_secret(secret: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
