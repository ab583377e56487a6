//! # Error Types
//!
//! Domain-specific error types for vendinha-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendinha-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule failures (checkout, ledgers)      │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  vendinha-db errors                                                     │
//! │  └── DbError          - Collection load/save failures                   │
//! │                                                                         │
//! │  vendinha-vision errors                                                 │
//! │  └── VisionError      - Recognition failure / empty / parse             │
//! │                                                                         │
//! │  shop app errors                                                        │
//! │  └── ShopError        - What the operator sees                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No operation here is fatal to the process: every error leaves the stores
//! usable and the operation can be retried.

use thiserror::Error;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cash handed over is less than the cart total.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart total: 24.00
    ///      │
    ///      ▼
    /// Operator types paid amount: 20.00 (CASH)
    ///      │
    ///      ▼
    /// InsufficientPayment { total: 24.00, paid: 20.00 }
    ///      │
    ///      ▼
    /// Nothing changed, operator corrects the amount and retries
    /// ```
    #[error("Insufficient payment: total {total}, paid {paid}")]
    InsufficientPayment { total: Money, paid: Money },

    /// Checkout would drive stock below zero while the policy forbids it.
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Checkout was requested for a cart without lines.
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Store debt not found: {0}")]
    DebtNotFound(String),

    /// Paid is a one-way flag; there is no unpaid transition.
    #[error("Store debt {0} is already paid")]
    DebtAlreadyPaid(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any store is mutated.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or positive.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must be different from zero.
    #[error("{field} must not be zero")]
    MustNotBeZero { field: String },

    /// Value out of allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a barcode with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. duplicate barcode).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientPayment {
            total: Money::from_cents(2400),
            paid: Money::from_cents(2000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: total 24.00, paid 20.00"
        );

        let err = CoreError::InsufficientStock {
            product: "Coca Cola 2L".to_string(),
            available: Quantity::from_units(1),
            requested: Quantity::from_units(2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Coca Cola 2L: available 1, requested 2"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
