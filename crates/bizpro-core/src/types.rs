//! # Domain Types
//!
//! Ledger records and the drafts the frontend submits to create them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │   │   SaleRecord    │   │  ExpenseRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (rowid)     │   │  id (rowid)     │   │  id (rowid)     │       │
//! │  │  name           │   │  item_name      │   │  description    │       │
//! │  │  quantity >= 0  │   │  quantity > 0   │   │  amount >= 0    │       │
//! │  │  price >= 0     │   │  total_price    │   │  created_at     │       │
//! │  │  created_at     │   │  created_at     │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │          ▲                     ▲                     ▲                  │
//! │          │ insert              │ insert              │ insert           │
//! │  ┌───────┴─────────┐   ┌───────┴─────────┐   ┌───────┴─────────┐       │
//! │  │NewInventoryItem │   │    NewSale      │   │   NewExpense    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Append-Only Records
//! Records are never updated or deleted. `id` and `created_at` are assigned
//! by the store at write time, which is why the drafts don't carry them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Inventory
// =============================================================================

/// A stock line in the inventory table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    /// Surrogate key assigned by the store.
    pub id: i64,

    /// Display name, stored trimmed.
    pub name: String,

    /// Units on hand. Zero is allowed (out of stock).
    pub quantity: i64,

    /// Unit price in the configured currency.
    pub price: f64,

    /// When the row was written (store clock, UTC).
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for a new inventory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl NewInventoryItem {
    /// Creates a new inventory draft.
    pub fn new(name: impl Into<String>, quantity: i64, price: f64) -> Self {
        NewInventoryItem {
            name: name.into(),
            quantity,
            price,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// A recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    pub id: i64,
    /// Name of the item sold (free text, not a foreign key).
    pub item_name: String,
    /// Units sold, always at least one.
    pub quantity: i64,
    /// Amount received for the whole sale.
    pub total_price: f64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for a new sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub item_name: String,
    pub quantity: i64,
    pub total_price: f64,
}

impl NewSale {
    /// Creates a new sale draft.
    pub fn new(item_name: impl Into<String>, quantity: i64, total_price: f64) -> Self {
        NewSale {
            item_name: item_name.into(),
            quantity,
            total_price,
        }
    }
}

// =============================================================================
// Expenses
// =============================================================================

/// A recorded business expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ExpenseRecord {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for a new expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
}

impl NewExpense {
    /// Creates a new expense draft.
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        NewExpense {
            description: description.into(),
            amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
