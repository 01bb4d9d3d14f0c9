//! # solar-db: Database Layer for Solar Quote
//!
//! This crate provides persistence for the Solar Quote system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Solar Quote Data Flow                            │
//! │                                                                         │
//! │  solar-quote quote ...                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     solar-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CatalogRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ IntegratorRepo│    │ 001_initial  │  │   │
//! │  │   │ Connection    │    │ ArchiveRepo   │    │ _schema.sql  │  │   │
//! │  │   │ Management    │    │ SequenceRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/solar-quote.db                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, integrator, archive and sequence stores
//! - [`seed`] - Stock catalog loading
//!
//! ## Usage
//!
//! ```rust,ignore
//! use solar_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/solar-quote.db")).await?;
//!
//! let catalog = db.catalog().snapshot().await?;
//! let number = db.quote_sequence().next_number().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use seed::{seed_default_catalog, SeedOutcome};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::integrator::IntegratorRepository;
pub use repository::quote::QuoteArchiveRepository;
pub use repository::sequence::QuoteSequenceRepository;
