//! # Error Types
//!
//! Domain-specific error types for bizpro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bizpro-core errors (this file)                                        │
//! │  └── ValidationError  - Input violates a field rule (expected)         │
//! │                                                                         │
//! │  bizpro-db errors (separate crate)                                     │
//! │  └── DbError          - Storage failures (exceptional)                 │
//! │                                                                         │
//! │  App errors (apps/bizpro)                                              │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → DbError::Validation → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every variant names the offending field
//! 3. Validation failures are returned, never panicked

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are expected, user-correctable failures. They are shown next to
/// the form field and are never logged as system faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is missing or only whitespace.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Monetary value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Raw input could not be parsed (e.g. "abc" as a quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Negative { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::NotFinite { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
