//! # Storage Handle
//!
//! Owns the one SQLite connection the ledger writes through.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Single-Connection Store                            │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure the store                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Connect + ensure schema                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │   SqlitePool (max_connections = 1)      │                           │
//! │  │            ┌──────┐                     │                           │
//! │  │            │ Conn │  no idle / lifetime │                           │
//! │  │            └──────┘  expiry             │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       ▲           ▲            ▲                                        │
//! │       │           │            │                                        │
//! │  inventory()   sales()    reports()   ← clones share the connection    │
//! │                                                                         │
//! │  An open transaction holds the only connection: other tasks wait on    │
//! │  it until it commits or rolls back.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::future::BoxFuture;
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions,
    SqliteRow, SqliteSynchronous,
};
use sqlx::{Sqlite, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::report::ReportAggregator;
use crate::repository::expense::ExpenseRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::sale::SaleRepository;
use crate::schema;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    /// Stores with a scoped transaction open in the current task.
    static OPEN_TRANSACTIONS: Vec<u64>;
}

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/bizpro.db")
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// How long to wait for the single connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to ensure the ledger schema on connect.
    /// Default: true
    pub ensure_schema: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            connect_timeout: Duration::from_secs(30),
            ensure_schema: true,
        }
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to ensure the schema on connect.
    pub fn ensure_schema(mut self, ensure: bool) -> Self {
        self.ensure_schema = ensure;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Every call yields a separate, empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            connect_timeout: Duration::from_secs(5),
            ensure_schema: true,
        }
    }

    /// Returns true if this config points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Statement Parameters
// =============================================================================

/// A positional parameter for [`Database::execute`] and [`Database::query_all`].
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Integer(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Real(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[SqlParam],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlParam::Integer(v) => query.bind(*v),
            SqlParam::Real(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.clone()),
            SqlParam::Null => query.bind(None::<i64>),
        };
    }
    query
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap and every clone shares the same live connection, so
/// the handle is opened once at startup and injected wherever it's needed.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::in_memory()).await?;
///
/// db.inventory().insert(NewInventoryItem::new("Widget", 10, 2.5)).await?;
/// let report = db.reports().generate_report(ReportPeriod::Weekly).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite pool, capped at one connection.
    pool: SqlitePool,

    /// Identifies this store (shared by clones) for nesting checks.
    store_id: u64,
}

impl Database {
    /// Opens the store.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL + NORMAL synchronous for files)
    /// 3. Opens the single, process-lifetime connection
    /// 4. Ensures the ledger schema (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError::ConnectionFailed)` - Store could not be opened
    /// * `Err(DbError::SchemaBootstrap)` - Tables could not be created
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                // Readers don't block the writer on the file
                .journal_mode(SqliteJournalMode::Wal)
                // May lose the last transaction on power loss, never corrupts
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        // One connection that never expires: an in-memory store lives
        // exactly as long as its connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!("Database connection established");

        let db = Database {
            pool,
            store_id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
        };

        if config.ensure_schema {
            db.ensure_schema().await?;
        }

        Ok(db)
    }

    /// Creates the ledger tables if they don't exist. Idempotent.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        schema::ensure_schema(self).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Executes a DDL/DML statement and returns the number of rows affected.
    ///
    /// ## Example
    /// ```rust,ignore
    /// db.execute(
    ///     "INSERT INTO expenses (description, amount) VALUES (?1, ?2)",
    ///     &[SqlParam::from("Rent"), SqlParam::Real(15000.0)],
    /// ).await?;
    /// ```
    pub async fn execute(&self, statement: &str, params: &[SqlParam]) -> DbResult<u64> {
        let result = bind_params(sqlx::query(statement), params)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Runs a read and returns every row.
    pub async fn query_all(&self, statement: &str, params: &[SqlParam]) -> DbResult<Vec<SqliteRow>> {
        let rows = bind_params(sqlx::query(statement), params)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Runs `body` inside a scoped transaction.
    ///
    /// ## Guarantees
    /// - `Ok` from the body → COMMIT
    /// - `Err` from the body → ROLLBACK, error returned unchanged
    /// - Panic or drop mid-body → the transaction rolls back on drop
    /// - A call from a task that already has a transaction open on this
    ///   store fails with [`DbError::NestedTransaction`] instead of waiting
    ///   on its own connection
    /// - Calls from other tasks wait for the connection and run in turn
    ///
    /// ## Example
    /// ```rust,ignore
    /// let name = "Widget".to_string();
    /// db.with_transaction(|conn| Box::pin(async move {
    ///     sqlx::query("INSERT INTO inventory (name, quantity, price) VALUES (?1, 1, 1.0)")
    ///         .bind(name)
    ///         .execute(&mut *conn)
    ///         .await?;
    ///     Ok(())
    /// })).await?;
    /// ```
    pub async fn with_transaction<T, F>(&self, body: F) -> DbResult<T>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, DbResult<T>>,
    {
        let mut open = OPEN_TRANSACTIONS
            .try_with(|ids| ids.clone())
            .unwrap_or_default();
        if open.contains(&self.store_id) {
            return Err(DbError::NestedTransaction);
        }
        open.push(self.store_id);

        // The scope ends with the future, including on cancellation
        OPEN_TRANSACTIONS
            .scope(open, self.run_transaction(body))
            .await
    }

    async fn run_transaction<T, F>(&self, body: F) -> DbResult<T>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, DbResult<T>>,
    {
        // Dropping `tx` before commit rolls back
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match body(&mut *tx).await {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Returns true while the calling task has a transaction open on this store.
    pub fn in_transaction(&self) -> bool {
        OPEN_TRANSACTIONS
            .try_with(|ids| ids.contains(&self.store_id))
            .unwrap_or(false)
    }

    /// Returns the inventory repository.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }

    /// Returns the expense repository.
    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }

    /// Returns the report aggregator.
    pub fn reports(&self) -> ReportAggregator {
        ReportAggregator::new(self.clone())
    }

    /// Closes the connection.
    ///
    /// ## Note
    /// After calling close, all operations fail with `ConnectionFailed`.
    /// An in-memory store is discarded.
    pub async fn close(&self) {
        info!("Closing database connection");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bizpro_core::{NewExpense, NewSale};
    use sqlx::Row;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn expense_count(db: &Database) -> i64 {
        let rows = db
            .query_all("SELECT COUNT(*) FROM expenses", &[])
            .await
            .unwrap();
        rows[0].get::<i64, _>(0)
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = test_db().await;
        assert!(db.health_check().await);
        assert!(!db.in_transaction());
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = test_db().await;
        let second = test_db().await;

        first
            .execute(
                "INSERT INTO expenses (description, amount) VALUES (?1, ?2)",
                &[SqlParam::from("Rent"), SqlParam::Real(100.0)],
            )
            .await
            .unwrap();

        assert_eq!(expense_count(&first).await, 1);
        assert_eq!(expense_count(&second).await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_the_connection() {
        let db = test_db().await;
        let clone = db.clone();

        clone
            .execute(
                "INSERT INTO expenses (description, amount) VALUES ('Water', 50.0)",
                &[],
            )
            .await
            .unwrap();

        assert_eq!(expense_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_transaction_commits() {
        let db = test_db().await;

        let inserted = db
            .with_transaction(|conn| {
                Box::pin(async move {
                    let result = sqlx::query(
                        "INSERT INTO expenses (description, amount) VALUES ('Fuel', 800.0)",
                    )
                    .execute(&mut *conn)
                    .await?;
                    Ok(result.rows_affected())
                })
            })
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(expense_count(&db).await, 1);
        assert!(!db.in_transaction());
    }

    #[tokio::test]
    async fn test_transaction_rolls_back_on_error() {
        let db = test_db().await;

        let result: DbResult<()> = db
            .with_transaction(|conn| {
                Box::pin(async move {
                    sqlx::query(
                        "INSERT INTO expenses (description, amount) VALUES ('Fuel', 800.0)",
                    )
                    .execute(&mut *conn)
                    .await?;
                    Err(DbError::Internal("boom".to_string()))
                })
            })
            .await;

        assert!(matches!(result, Err(DbError::Internal(_))));
        assert_eq!(expense_count(&db).await, 0);
        assert!(!db.in_transaction());
    }

    #[tokio::test]
    async fn test_nested_transaction_is_rejected() {
        let db = test_db().await;
        let inner = db.clone();

        let result: DbResult<()> = db
            .with_transaction(move |_conn| {
                Box::pin(async move {
                    inner
                        .with_transaction(|_conn| Box::pin(async move { Ok(()) }))
                        .await
                })
            })
            .await;

        assert!(matches!(result, Err(DbError::NestedTransaction)));
        // The outer scope still cleaned up
        assert!(!db.in_transaction());
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_concurrent_transactions_run_in_turn() {
        let db = test_db().await;
        let other = db.clone();

        for _ in 0..20 {
            let sales = db.sales();
            let expenses = other.expenses();
            let (first, second) = tokio::join!(
                sales.insert(NewSale::new("Bread", 1, 10.0)),
                expenses.insert(NewExpense::new("Fuel", 5.0)),
            );
            first.unwrap();
            second.unwrap();
        }

        assert_eq!(db.sales().count().await.unwrap(), 20);
        assert_eq!(expense_count(&db).await, 20);
    }

    #[tokio::test]
    async fn test_transactions_on_separate_tasks() {
        let db = test_db().await;

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.expenses()
                        .insert(NewExpense::new(format!("Cost {}", n), 1.0))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(expense_count(&db).await, 8);
    }

    #[tokio::test]
    async fn test_nesting_on_another_store_is_allowed() {
        let db = test_db().await;
        let other = test_db().await;
        let inner = other.clone();

        db.with_transaction(move |_conn| {
            Box::pin(async move {
                inner
                    .with_transaction(|conn| {
                        Box::pin(async move {
                            sqlx::query(
                                "INSERT INTO expenses (description, amount) VALUES ('Tea', 20.0)",
                            )
                            .execute(&mut *conn)
                            .await?;
                            Ok(())
                        })
                    })
                    .await
            })
        })
        .await
        .unwrap();

        assert_eq!(expense_count(&other).await, 1);
        assert_eq!(expense_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_cancelled_transaction_rolls_back() {
        let db = test_db().await;

        let result = tokio::time::timeout(
            Duration::from_millis(50),
            db.with_transaction(|conn| {
                Box::pin(async move {
                    sqlx::query(
                        "INSERT INTO expenses (description, amount) VALUES ('Fuel', 800.0)",
                    )
                    .execute(&mut *conn)
                    .await?;
                    std::future::pending::<()>().await;
                    Ok(())
                })
            }),
        )
        .await;

        assert!(result.is_err());
        assert!(!db.in_transaction());
        assert_eq!(expense_count(&db).await, 0);

        // The connection is usable again
        db.expenses()
            .insert(NewExpense::new("Water", 50.0))
            .await
            .unwrap();
        assert_eq!(expense_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_constraint_violation_is_reported() {
        let db = test_db().await;

        let err = db
            .execute(
                "INSERT INTO inventory (name, quantity, price) VALUES (?1, ?2, ?3)",
                &[
                    SqlParam::from("Widget"),
                    SqlParam::Integer(-1),
                    SqlParam::Real(1.0),
                ],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_closed_database_fails() {
        let db = test_db().await;
        db.close().await;

        assert!(!db.health_check().await);
        let err = match db.query_all("SELECT 1", &[]).await {
            Ok(_) => panic!("called `Result::unwrap_err()` on an `Ok` value"),
            Err(err) => err,
        };
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/bizpro.db")
            .connect_timeout(Duration::from_secs(3))
            .ensure_schema(false);

        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.ensure_schema);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
