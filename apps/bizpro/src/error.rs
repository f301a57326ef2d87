//! # API Error Type
//!
//! Unified error type for everything the presentation layer calls.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in BizPro                                 │
//! │                                                                         │
//! │  Screen                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  record_sale(...)                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  BizPro method                                                   │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ─── ValidationError ───────────────┐               │  │
//! │  │         │                                        │               │  │
//! │  │         ▼                                        ▼               │  │
//! │  │  Storage? ────── DbError (logged) ──────────── ApiError ───────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The screen shows `message` and keeps its form state.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use bizpro_core::ValidationError;
use bizpro_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from every facade call.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "quantity must be positive"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before storage
    ValidationError,

    /// Storage read or write failed
    DatabaseError,

    /// Ledger tables could not be created
    SchemaError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Programming error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Returns true if the caller can fix this by correcting input.
    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts database errors to API errors.
///
/// Storage failures are logged with their detail; the message that
/// reaches the screen stays generic.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Validation(e) => ApiError::from(e),
            DbError::ConstraintViolation(e) => {
                // Validation already passed, so the caller cannot fix this
                tracing::error!("Constraint violation: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Record violates ledger constraints")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::SchemaBootstrap(e) => {
                tracing::error!("Schema bootstrap failed: {}", e);
                ApiError::new(ErrorCode::SchemaError, "Could not prepare ledger tables")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Timed out waiting for the database connection");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy")
            }
            DbError::NestedTransaction => {
                tracing::error!("Nested transaction attempted");
                ApiError::internal("Nested transactions are not supported")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading or validating [`AppConfig`](crate::config::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
