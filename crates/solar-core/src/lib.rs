//! # solar-core: Pure Quoting Logic for Solar Quote
//!
//! This crate is the **heart** of Solar Quote. It contains the pricing
//! engine and every rule it depends on as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Solar Quote Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    quote-cli (solar-quote binary)               │   │
//! │  │    quote, catalog, integrator, archive, seed                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ solar-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  engine   │  │ discount  │  │ financing │  │   │
//! │  │   │  Catalog  │  │ price_    │  │ Profile   │  │ Breakdown │  │   │
//! │  │   │  Item     │  │ config..  │  │ tiers     │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ numbering │  │  render   │  │ validation│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    solar-db (Database Layer)                    │   │
//! │  │        SQLite catalog store, quote archive, quote sequence      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Quote input/output types and fixed-point scalars
//! - [`catalog`] - Catalog entities and the immutable snapshot
//! - [`engine`] - Component derivation and pricing
//! - [`discount`] - Customer and integrator multipliers
//! - [`financing`] - Card financing breakdown
//! - [`numbering`] - `YYYY-NNNNN` quote numbers
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`render`] - Plain-text quote summary
//! - [`defaults`] - Stock catalog used to seed new databases
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation
//!
//! ## Example Usage
//!
//! ```rust
//! use solar_core::defaults::default_catalog;
//! use solar_core::engine::price_configuration;
//! use solar_core::numbering::QuoteNumber;
//! use solar_core::types::{PaymentType, QuoteConfiguration, RoofType};
//!
//! let config = QuoteConfiguration {
//!     customer_name: "Maria Souza".into(),
//!     email: "maria@example.com".into(),
//!     phone: None,
//!     installation_city: "Campinas".into(),
//!     roof_type: RoofType::Ceramic,
//!     panel_id: "panel-ja-630".into(),
//!     panel_count: 10,
//!     microinverter_id: "inv-weg-siw100g-m010".into(),
//!     payment_type: PaymentType::Cash,
//!     credit_card_term_id: None,
//! };
//!
//! let quote = price_configuration(&config, &default_catalog(), None, QuoteNumber::new(2026, 1))
//!     .unwrap();
//! assert_eq!(quote.total_component_cost.cents(), 2_535_430);
//! assert_eq!(quote.final_discounted_price.cents(), 1_073_300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod defaults;
pub mod discount;
pub mod engine;
pub mod error;
pub mod financing;
pub mod money;
pub mod numbering;
pub mod render;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CatalogItem, ComponentKind, IntegratorProfile};
pub use engine::price_configuration;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use numbering::{QuoteNumber, QuoteSequence};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Overflow guard for the panel count; far above any real installation.
pub const MAX_PANEL_COUNT: u32 = 1_000_000;

/// Maximum length of names, cities and descriptions.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of identifiers and part codes.
pub const MAX_CODE_LENGTH: usize = 64;

/// Minimum length of an integrator secret.
pub const MIN_SECRET_LENGTH: usize = 8;
