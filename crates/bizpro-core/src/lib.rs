//! # bizpro-core: Pure Business Logic for the BizPro Ledger
//!
//! Record types, field validation, and report period arithmetic for a
//! single-device business ledger (inventory, sales, expenses). Nothing in
//! this crate touches the database, the file system, or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizPro Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Mobile Frontend (screens, forms)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/bizpro (ApiError, config)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bizpro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐  ┌────────────────┐  ┌────────────────┐   │   │
//! │  │   │     types      │  │   validation   │  │     report     │   │   │
//! │  │   │ InventoryItem  │  │ required text  │  │ ReportPeriod   │   │   │
//! │  │   │ SaleRecord     │  │ quantities     │  │ ReportWindow   │   │   │
//! │  │   │ ExpenseRecord  │  │ amounts        │  │ Report         │   │   │
//! │  │   └────────────────┘  └────────────────┘  └────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bizpro-db (Database Layer)                   │   │
//! │  │          SQLite schema, ledger repositories, aggregation        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Persisted records and their input drafts
//! - [`validation`] - Field-level rules applied before every write
//! - [`report`] - Report periods, windows, and the derived `Report`
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use bizpro_core::validation::validate_new_sale;
//! use bizpro_core::NewSale;
//!
//! let sale = validate_new_sale(NewSale::new("  Sugar 1kg ", 2, 360.0)).unwrap();
//! assert_eq!(sale.item_name, "Sugar 1kg");
//!
//! // A sale has to move at least one unit
//! assert!(validate_new_sale(NewSale::new("Sugar 1kg", 0, 0.0)).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use report::{Report, ReportPeriod, ReportWindow};
pub use types::*;
