//! # Repository Module
//!
//! Ledger repositories, one per record kind.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Repositories                                  │
//! │                                                                         │
//! │  Presentation                                                          │
//! │       │                                                                 │
//! │       │  db.sales().insert(NewSale::new("Bread", 2, 110.0))            │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── insert(&self, draft)   validate → scoped transaction → rowid      │
//! │  ├── fetch_all(&self)       newest first                               │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (single connection)                                            │
//! │                                                                         │
//! │  No update, no delete: the ledger is append-only.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Stock lines
//! - [`SaleRepository`](sale::SaleRepository) - Sales
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Expenses

pub mod expense;
pub mod inventory;
pub mod sale;
