//! # Error Types
//!
//! Domain-specific error types for solar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  solar-core errors (this file)                                         │
//! │  ├── CoreError        - Fatal pricing errors (no quote produced)       │
//! │  └── ValidationError  - Boundary validation failures                   │
//! │                                                                         │
//! │  solar-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  quote-cli (binary)                                                    │
//! │  └── anyhow::Error    - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → anyhow → stderr         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fatal vs Recoverable
//! Only the three pricing variants of [`CoreError`] abort a quote. Missing
//! supporting catalog rows (breakers, cables, structures...) never reach this
//! module: the engine turns them into zero-cost placeholder lines instead.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Fatal errors raised while pricing a configuration.
///
/// The message is surfaced verbatim to the operator, so the `Display`
/// output is the bare message without a prefix.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Malformed input quantities (e.g. zero panels).
    #[error("{0}")]
    InvalidInput(String),

    /// A mandatory selection (panel, microinverter) did not resolve.
    ///
    /// ## When This Occurs
    /// - Panel id no longer exists in the catalog snapshot
    /// - Inverter id resolves to a string inverter instead of a micro
    #[error("{0}")]
    NotFound(String),

    /// A mandatory regional price is missing.
    ///
    /// ## When This Occurs
    /// - Panel or microinverter has no southeast price registered
    #[error("{0}")]
    MissingPrice(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Short machine-readable code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::MissingPrice(_) => "MISSING_PRICE",
            CoreError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary (catalog CRUD, CLI input) before any value reaches
/// the engine. Malformed numbers are rejected here instead of being coerced
/// to zero.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. malformed quote number, e-mail).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. two breaker rules for the same key).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_errors_display_verbatim() {
        let err = CoreError::InvalidInput("panel count must be greater than zero".to_string());
        assert_eq!(err.to_string(), "panel count must be greater than zero");
        assert_eq!(err.code(), "INVALID_INPUT");

        let err = CoreError::MissingPrice("southeast price not set for panel X".to_string());
        assert_eq!(err.to_string(), "southeast price not set for panel X");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Duplicate {
            field: "breaker rule".to_string(),
            value: "SIW100G M010 W00 x1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "breaker rule 'SIW100G M010 W00 x1' already exists"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.code(), "VALIDATION_ERROR");
    }
}
