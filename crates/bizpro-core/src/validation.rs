//! # Validation Module
//!
//! Field-level rules applied before anything is written to the ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  └── Raw text: parse_quantity / parse_amount                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_new_item / validate_new_sale / validate_new_expense      │
//! │  └── Returns the normalized (trimmed) draft                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repository insert (re-validates)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: SQLite CHECK / NOT NULL constraints                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizpro_core::validation::{validate_new_item, parse_quantity};
//! use bizpro_core::NewInventoryItem;
//!
//! let qty = parse_quantity("quantity", "12").unwrap();
//! let item = validate_new_item(NewInventoryItem::new("  Widget  ", qty, 4.5)).unwrap();
//! assert_eq!(item.name, "Widget");
//! ```

use crate::error::ValidationError;
use crate::types::{NewExpense, NewInventoryItem, NewSale};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
///
/// ## Example
/// ```rust
/// use bizpro_core::validation::validate_required;
///
/// assert_eq!(validate_required("name", "  Widget ").unwrap(), "Widget");
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates a stock quantity. Zero is allowed.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<i64> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(qty)
}

/// Validates a sale quantity.
///
/// A sale has to move at least one unit, so zero is rejected here even
/// though inventory allows it.
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<i64> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(qty)
}

/// Validates a monetary value (price, total, amount).
///
/// ## Rules
/// - Must be finite (NaN and ±Infinity are rejected)
/// - Must be non-negative (zero is allowed: free items, waived fees)
///
/// ## Example
/// ```rust
/// use bizpro_core::validation::validate_amount;
///
/// assert!(validate_amount("price", 0.0).is_ok());
/// assert!(validate_amount("price", -0.01).is_err());
/// assert!(validate_amount("price", f64::NAN).is_err());
/// ```
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    // -0.0 passes the check above; store it as plain zero
    Ok(if value == 0.0 { 0.0 } else { value })
}

// =============================================================================
// Raw Input Parsers
// =============================================================================

/// Parses a quantity typed into a form.
///
/// Only whole numbers are accepted: "2.5" is not an integer.
pub fn parse_quantity(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    raw.parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "not an integer".to_string(),
        })
}

/// Parses a monetary value typed into a form.
pub fn parse_amount(field: &str, raw: &str) -> ValidationResult<f64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value = raw
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "not a number".to_string(),
        })?;

    validate_amount(field, value)
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates an inventory draft and returns its normalized form.
pub fn validate_new_item(item: NewInventoryItem) -> ValidationResult<NewInventoryItem> {
    Ok(NewInventoryItem {
        name: validate_required("name", &item.name)?,
        quantity: validate_stock_quantity(item.quantity)?,
        price: validate_amount("price", item.price)?,
    })
}

/// Validates a sale draft and returns its normalized form.
pub fn validate_new_sale(sale: NewSale) -> ValidationResult<NewSale> {
    Ok(NewSale {
        item_name: validate_required("item_name", &sale.item_name)?,
        quantity: validate_sale_quantity(sale.quantity)?,
        total_price: validate_amount("total_price", sale.total_price)?,
    })
}

/// Validates an expense draft and returns its normalized form.
pub fn validate_new_expense(expense: NewExpense) -> ValidationResult<NewExpense> {
    Ok(NewExpense {
        description: validate_required("description", &expense.description)?,
        amount: validate_amount("amount", expense.amount)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
