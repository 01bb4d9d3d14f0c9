//! # Repository Module
//!
//! Database repository implementations for Solar Quote.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  quote-cli command                                                     │
//! │       │                                                                 │
//! │       │  db.catalog().snapshot()                                       │
//! │       ▼                                                                 │
//! │  CatalogRepository                                                     │
//! │  ├── upsert / upsert_many                                              │
//! │  ├── get / list / delete / count                                       │
//! │  ├── upsert_breaker_rule / delete_breaker_rule / list_breaker_rules    │
//! │  └── snapshot ──► solar_core::Catalog                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL stays in this module; solar-core never sees a row.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Catalog items and breaker rules
//! - [`IntegratorRepository`](integrator::IntegratorRepository) - Integrator accounts
//! - [`QuoteArchiveRepository`](quote::QuoteArchiveRepository) - Append-only quote archive
//! - [`QuoteSequenceRepository`](sequence::QuoteSequenceRepository) - Quote number counter

pub mod catalog;
pub mod integrator;
pub mod quote;
pub mod sequence;
