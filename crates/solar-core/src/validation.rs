//! # Validation Module
//!
//! Input validation for catalog writes and quote requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / JSON import                                            │
//! │  ├── Type validation (clap parsing, serde deserialization)             │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog store                                                │
//! │  └── Calls validate_catalog_item() before every upsert                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── PRIMARY KEY on (kind, id) and on breaker rule keys                │
//! │                                                                         │
//! │  Bad numbers are REJECTED here, never coerced to zero.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use solar_core::validation::{validate_identifier, validate_panel_count};
//!
//! validate_identifier("id", "panel-ja-630").unwrap();
//! assert!(validate_panel_count(u32::MAX).is_err());
//! ```

use crate::catalog::{BreakerRule, CatalogItem};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{PaymentType, QuoteConfiguration, Rate, RegionalPrice};
use crate::{MAX_CODE_LENGTH, MAX_NAME_LENGTH, MAX_PANEL_COUNT, MIN_SECRET_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field (names, cities).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a catalog identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_CODE_LENGTH`] characters
/// - Letters, numbers, hyphens, underscores and dots only
///
/// ## Example
/// ```rust
/// use solar_core::validation::validate_identifier;
///
/// assert!(validate_identifier("id", "cb-mdwp-c10-2").is_ok());
/// assert!(validate_identifier("id", "").is_err());
/// assert!(validate_identifier("id", "has space").is_err());
/// ```
pub fn validate_identifier(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, underscores and dots"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates an optional manufacturer part code.
///
/// `None` is fine; `Some("")` is not.
pub fn validate_part_code(code: Option<&str>) -> ValidationResult<()> {
    let Some(code) = code else {
        return Ok(());
    };
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "part code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "part code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    Ok(())
}

/// Validates an e-mail address (presence of a local part and a domain).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain".to_string(),
        }),
    }
}

/// Validates an integrator login name.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_identifier("username", username)
}

/// Validates an integrator secret before it is hashed.
pub fn validate_secret(secret: &str) -> ValidationResult<()> {
    if secret.is_empty() {
        return Err(ValidationError::Required {
            field: "secret".to_string(),
        });
    }

    if secret.chars().count() < MIN_SECRET_LENGTH {
        return Err(ValidationError::TooShort {
            field: "secret".to_string(),
            min: MIN_SECRET_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Guards the panel count against arithmetic overflow.
///
/// Zero is not rejected here: the engine owns that check and reports
/// "panel count must be greater than zero".
pub fn validate_panel_count(count: u32) -> ValidationResult<()> {
    if count > MAX_PANEL_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "panel count".to_string(),
            min: 0,
            max: MAX_PANEL_COUNT as i64,
        });
    }
    Ok(())
}

/// Validates a catalog price (strictly positive).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates regional pricing: southeast is mandatory, every present
/// price must be positive.
pub fn validate_regional_price(price: &RegionalPrice) -> ValidationResult<()> {
    let Some(southeast) = price.southeast else {
        return Err(ValidationError::Required {
            field: "southeast price".to_string(),
        });
    };
    validate_price("southeast price", southeast)?;

    let others = [
        ("south price", price.south),
        ("center-west price", price.center_west),
        ("north price", price.north),
        ("northeast price", price.northeast),
    ];
    for (field, value) in others {
        if let Some(value) = value {
            validate_price(field, value)?;
        }
    }

    Ok(())
}

/// Validates a strictly positive count field.
pub fn validate_positive(field: &str, value: u32) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a card cost rate (0% to 100%).
pub fn validate_cost_rate(rate: Rate) -> ValidationResult<()> {
    if rate.bps() > Rate::SCALE {
        return Err(ValidationError::OutOfRange {
            field: "cost rate (bps)".to_string(),
            min: 0,
            max: Rate::SCALE as i64,
        });
    }
    Ok(())
}

fn validate_finite_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates any catalog item before it is written to the store.
pub fn validate_catalog_item(item: &CatalogItem) -> ValidationResult<()> {
    validate_identifier("id", item.id())?;
    validate_name("name", item.name())?;

    match item {
        CatalogItem::Panel(p) => {
            validate_part_code(p.part_code.as_deref())?;
            validate_positive("power (Wp)", p.power_wp)?;
            validate_regional_price(&p.price)
        }
        CatalogItem::Inverter(i) => {
            validate_part_code(i.part_code.as_deref())?;
            validate_name("model name", &i.model_name)?;
            validate_finite_positive("power (kW)", i.power_kw)?;
            validate_regional_price(&i.price)
        }
        CatalogItem::MountingStructure(s) => {
            validate_part_code(s.part_code.as_deref())?;
            validate_positive("panels per unit", s.panels_per_unit)?;
            if s.compatible_roof_types.is_empty() {
                return Err(ValidationError::Required {
                    field: "compatible roof types".to_string(),
                });
            }
            validate_price("price", s.price)
        }
        CatalogItem::Cable(c) => {
            validate_part_code(c.part_code.as_deref())?;
            validate_positive("length per unit (m)", c.length_per_unit_m)?;
            validate_price("price", c.price)
        }
        CatalogItem::SurgeProtector(s) => {
            validate_part_code(s.part_code.as_deref())?;
            validate_price("price", s.price)
        }
        CatalogItem::CircuitBreaker(b) => {
            validate_part_code(b.part_code.as_deref())?;
            validate_name("model code", &b.model_code)?;
            validate_positive("amps", b.amps)?;
            validate_positive("poles", b.poles)?;
            validate_price("price", b.price)
        }
        CatalogItem::AcConnector(c) => {
            validate_part_code(c.part_code.as_deref())?;
            validate_price("price", c.price)
        }
        CatalogItem::InverterSupport(s) => {
            validate_part_code(s.part_code.as_deref())?;
            validate_price("price", s.price)
        }
        CatalogItem::CreditCardTerm(t) => {
            validate_name("code", &t.code)?;
            validate_cost_rate(t.cost_rate)
        }
    }
}

/// Validates a breaker rule before it is written to the store.
pub fn validate_breaker_rule(rule: &BreakerRule) -> ValidationResult<()> {
    validate_name("inverter model", &rule.inverter_model)?;
    validate_name("breaker model code", &rule.breaker_model_code)?;
    if rule.micros_in_series == 0 || rule.micros_in_series > crate::engine::MAX_SERIAL_ASSOCIATION
    {
        return Err(ValidationError::OutOfRange {
            field: "micros in series".to_string(),
            min: 1,
            max: crate::engine::MAX_SERIAL_ASSOCIATION as i64,
        });
    }
    Ok(())
}

/// Validates a quote request before it reaches the engine.
pub fn validate_quote_configuration(config: &QuoteConfiguration) -> ValidationResult<()> {
    validate_name("customer name", &config.customer_name)?;
    validate_email(&config.email)?;
    validate_name("installation city", &config.installation_city)?;
    validate_panel_count(config.panel_count)?;

    if config.panel_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "panel".to_string(),
        });
    }
    if config.microinverter_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "microinverter".to_string(),
        });
    }

    if config.payment_type == PaymentType::Card && config.credit_card_term_id.is_none() {
        return Err(ValidationError::Required {
            field: "credit card term".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
