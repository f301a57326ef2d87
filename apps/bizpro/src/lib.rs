//! # BizPro Application Layer
//!
//! The boundary the screens talk to: dashboard, inventory, sales,
//! expenses, and reports.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    BizPro Startup Flow                                  │
//! │                                                                         │
//! │  1. Load Configuration ───────────────────────────────────────────────► │
//! │     • bizpro.toml (if present) + BIZPRO_* overrides                    │
//! │                                                                         │
//! │  2. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • RUST_LOG wins, then [logging] filter                              │
//! │                                                                         │
//! │  3. Open the Ledger ──────────────────────────────────────────────────► │
//! │     • One connection for the process lifetime                          │
//! │     • inventory, sales, expenses tables ensured                         │
//! │                                                                         │
//! │  4. Serve Screens ────────────────────────────────────────────────────► │
//! │     • Every call returns Result<_, ApiError>                            │
//! │     • On error the screen keeps its form state                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let app = BizPro::open(AppConfig::load(None)?).await?;
//! app.record_sale("Bread", 2, 110.0).await?;
//! let report = app.report("daily").await?;
//! println!("Net profit: {}", app.format_amount(report.net_profit));
//! ```

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{ApiError, ConfigError, ErrorCode};

use bizpro_core::validation::{parse_amount, parse_quantity};
use bizpro_core::{
    ExpenseRecord, InventoryItem, NewExpense, NewInventoryItem, NewSale, Report, ReportPeriod,
    SaleRecord,
};
use bizpro_db::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bizpro_db=trace` - Trace storage only
///
/// Returns false if a subscriber was already installed.
pub fn init_tracing(fallback_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_filter))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// Application handle.
///
/// Cloning is cheap and every clone shares the one store connection, so
/// screens can each hold their own handle.
#[derive(Debug, Clone)]
pub struct BizPro {
    db: Database,
    config: AppConfig,
}

impl BizPro {
    /// Starts logging and opens the ledger described by `config`.
    pub async fn open(config: AppConfig) -> Result<Self, ApiError> {
        config.validate()?;
        init_tracing(&config.logging.filter);

        let db_config = config.db_config()?;
        if !db_config.is_in_memory() {
            if let Some(parent) = db_config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|source| {
                        ConfigError::Io {
                            path: parent.to_path_buf(),
                            source,
                        }
                    })?;
                }
            }
        }

        info!(path = %db_config.database_path.display(), "Opening BizPro ledger");
        let db = Database::new(db_config).await?;

        Ok(BizPro { db, config })
    }

    /// Returns the underlying store handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Adds a stock line and returns its id.
    pub async fn add_inventory_item(
        &self,
        name: &str,
        quantity: i64,
        price: f64,
    ) -> Result<i64, ApiError> {
        Ok(self
            .db
            .inventory()
            .insert(NewInventoryItem::new(name, quantity, price))
            .await?)
    }

    /// Adds a stock line from raw form text.
    pub async fn add_inventory_from_input(
        &self,
        name: &str,
        quantity: &str,
        price: &str,
    ) -> Result<i64, ApiError> {
        let quantity = parse_quantity("quantity", quantity)?;
        let price = parse_amount("price", price)?;
        self.add_inventory_item(name, quantity, price).await
    }

    /// Every stock line, newest first.
    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        Ok(self.db.inventory().fetch_all().await?)
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale and returns its id.
    pub async fn record_sale(
        &self,
        item_name: &str,
        quantity: i64,
        total_price: f64,
    ) -> Result<i64, ApiError> {
        Ok(self
            .db
            .sales()
            .insert(NewSale::new(item_name, quantity, total_price))
            .await?)
    }

    /// Records a sale from raw form text.
    pub async fn record_sale_from_input(
        &self,
        item_name: &str,
        quantity: &str,
        total_price: &str,
    ) -> Result<i64, ApiError> {
        let quantity = parse_quantity("quantity", quantity)?;
        let total_price = parse_amount("total_price", total_price)?;
        self.record_sale(item_name, quantity, total_price).await
    }

    /// Every sale, newest first.
    pub async fn list_sales(&self) -> Result<Vec<SaleRecord>, ApiError> {
        Ok(self.db.sales().fetch_all().await?)
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    /// Records an expense and returns its id.
    pub async fn record_expense(&self, description: &str, amount: f64) -> Result<i64, ApiError> {
        Ok(self
            .db
            .expenses()
            .insert(NewExpense::new(description, amount))
            .await?)
    }

    /// Records an expense from raw form text.
    pub async fn record_expense_from_input(
        &self,
        description: &str,
        amount: &str,
    ) -> Result<i64, ApiError> {
        let amount = parse_amount("amount", amount)?;
        self.record_expense(description, amount).await
    }

    /// Every expense, newest first.
    pub async fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, ApiError> {
        Ok(self.db.expenses().fetch_all().await?)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Generates a report for a period name ("daily", "weekly", "monthly").
    pub async fn report(&self, period: &str) -> Result<Report, ApiError> {
        let period: ReportPeriod = period.parse()?;
        self.report_for(period).await
    }

    pub async fn report_for(&self, period: ReportPeriod) -> Result<Report, ApiError> {
        Ok(self.db.reports().generate_report(period).await?)
    }

    // =========================================================================
    // Display & Lifecycle
    // =========================================================================

    /// Formats an amount with the configured currency, e.g. `KES 12.50`.
    pub fn format_amount(&self, amount: f64) -> String {
        format!(
            "{} {:.*}",
            self.config.currency.code,
            usize::from(self.config.currency.decimals),
            amount
        )
    }

    /// Returns true if the store answers queries.
    pub async fn health_check(&self) -> bool {
        self.db.health_check().await
    }

    /// Closes the store. Later calls fail with a database error.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
