//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        ValidationError (bizpro-core)       │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in apps/bizpro) ← Serialized for frontend                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays user-friendly message                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bizpro_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
///
/// Everything except [`DbError::Validation`] is a storage fault: the
/// caller must report failure and must not assume the write happened.
#[derive(Debug, Error)]
pub enum DbError {
    /// A draft failed re-validation inside the repository.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A CHECK or NOT NULL constraint rejected the row.
    ///
    /// ## When This Occurs
    /// - A write bypassed the validators (raw SQL)
    /// - A non-finite value reached a NOT NULL REAL column
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - File permissions issue
    /// - Handle used after `close()`
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Creating the ledger tables failed. Fatal for the session.
    #[error("Schema bootstrap failed: {0}")]
    SchemaBootstrap(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin, commit, or rollback failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// `with_transaction` was called while another transaction was open.
    #[error("Nested transactions are not supported")]
    NestedTransaction,

    /// The single connection was not released in time.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Returns true for expected, user-correctable input errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Validation(_))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints as
                // "CHECK constraint failed: <expr>" / "NOT NULL constraint failed: <table>.<column>"
                if msg.contains("CHECK constraint failed")
                    || msg.contains("NOT NULL constraint failed")
                {
                    DbError::ConstraintViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_transparent() {
        let err: DbError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
        assert!(!DbError::NestedTransaction.is_validation());
    }
}
