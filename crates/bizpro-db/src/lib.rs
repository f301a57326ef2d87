//! # bizpro-db: Database Layer for the BizPro Ledger
//!
//! This crate stores inventory, sales, and expenses in a local SQLite file
//! and aggregates them into period reports. It uses sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizPro Data Flow                                 │
//! │                                                                         │
//! │  Presentation (record_sale, report, ...)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bizpro-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │ inventory.rs  │    │  (schema.rs) │  │   │
//! │  │   │               │    │ sale.rs       │    │              │  │   │
//! │  │   │ one connection│◄───│ expense.rs    │    │ 3 tables     │  │   │
//! │  │   │ transactions  │    ├───────────────┤    │ + indexes    │  │   │
//! │  │   │               │◄───│ report.rs     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/bizpro.db                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Storage handle, statement primitives, scoped transactions
//! - [`schema`] - Ledger table bootstrap
//! - [`error`] - Database error types
//! - [`repository`] - Inventory, sale, and expense repositories
//! - [`report`] - Period report aggregation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bizpro_db::{Database, DbConfig};
//! use bizpro_core::{NewSale, ReportPeriod};
//!
//! // Connect and ensure the schema
//! let db = Database::new(DbConfig::new("path/to/bizpro.db")).await?;
//!
//! // Write through a repository
//! db.sales().insert(NewSale::new("Bread", 2, 110.0)).await?;
//!
//! // Aggregate
//! let report = db.reports().generate_report(ReportPeriod::Daily).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod report;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, SqlParam, IN_MEMORY_PATH};
pub use report::ReportAggregator;

// Repository re-exports for convenience
pub use repository::expense::ExpenseRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::sale::SaleRepository;
