//! # Schema Manager
//!
//! Creates the three ledger tables at startup.
//!
//! ## Bootstrap Process
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Bootstrap                                   │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │       ├── CREATE TABLE IF NOT EXISTS inventory                         │
//! │       ├── CREATE TABLE IF NOT EXISTS sales                             │
//! │       ├── CREATE TABLE IF NOT EXISTS expenses                          │
//! │       └── CREATE INDEX IF NOT EXISTS ... (created_at, per table)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← all tables or none                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ledger ready                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Idempotent: runs on every start, never alters existing rows
//! - Constraints mirror the validators in `bizpro_core::validation`
//! - `created_at` is written by SQLite as UTC text with millisecond
//!   precision, so text order equals time order

use tracing::{error, info};

use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// Names of the ledger tables, in creation order.
pub const LEDGER_TABLES: [&str; 3] = ["inventory", "sales", "expenses"];

const CREATE_INVENTORY: &str = r#"
CREATE TABLE IF NOT EXISTS inventory (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    quantity INTEGER NOT NULL CHECK (quantity >= 0),
    price REAL NOT NULL CHECK (price >= 0),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
)
"#;

// Sales must move at least one unit (stricter than inventory)
const CREATE_SALES: &str = r#"
CREATE TABLE IF NOT EXISTS sales (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_name TEXT NOT NULL CHECK (length(trim(item_name)) > 0),
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    total_price REAL NOT NULL CHECK (total_price >= 0),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
)
"#;

const CREATE_EXPENSES: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL CHECK (length(trim(description)) > 0),
    amount REAL NOT NULL CHECK (amount >= 0),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
)
"#;

const SCHEMA: [&str; 6] = [
    CREATE_INVENTORY,
    CREATE_SALES,
    CREATE_EXPENSES,
    "CREATE INDEX IF NOT EXISTS idx_inventory_created_at ON inventory (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_sales_created_at ON sales (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_expenses_created_at ON expenses (created_at)",
];

/// Ensures all ledger tables exist.
///
/// ## Errors
/// Any failure is reported as [`DbError::SchemaBootstrap`]; the application
/// cannot use the ledger without its tables.
pub async fn ensure_schema(db: &Database) -> DbResult<()> {
    info!("Ensuring ledger schema");

    let result = db
        .with_transaction(|conn| {
            Box::pin(async move {
                for statement in SCHEMA {
                    sqlx::query(statement).execute(&mut *conn).await?;
                }
                Ok(())
            })
        })
        .await;

    if let Err(err) = result {
        error!(error = %err, "Schema bootstrap failed");
        return Err(match err {
            DbError::SchemaBootstrap(_) => err,
            other => DbError::SchemaBootstrap(other.to_string()),
        });
    }

    info!(tables = ?LEDGER_TABLES, "Ledger schema ready");
    Ok(())
}

/// Returns which ledger tables currently exist.
///
/// ## Usage
/// For diagnostics and health checks.
pub async fn existing_tables(db: &Database) -> DbResult<Vec<String>> {
    let tables: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table' AND name IN ('inventory', 'sales', 'expenses')
        ORDER BY name
        "#,
    )
    .fetch_all(db.pool())
    .await?;

    Ok(tables)
}
