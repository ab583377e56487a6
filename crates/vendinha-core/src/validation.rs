//! # Validation Module
//!
//! Input validation for everything the operator types or the recognition
//! service hands back.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary parsing                                              │
//! │  ├── CLI arguments, recognition JSON (vendinha-vision schema)           │
//! │  └── Decimals rounded into Money / Quantity                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │  ├── Required names, positive quantities                                │
//! │  └── Runs BEFORE any store is touched                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores (CatalogStore / LedgerStore)                           │
//! │  └── Lookups by id, duplicate barcodes                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vendinha_core::validation::{validate_product_name, validate_quantity};
//! use vendinha_core::quantity::Quantity;
//!
//! validate_product_name("Detergente Ypê").unwrap();
//! validate_quantity(Quantity::from_units(5)).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use vendinha_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coca Cola 2L").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 200)
}

/// Validates a client name. Same rules as a product name.
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_required_text("client name", name, 200)
}

/// Validates the title of a store debt.
pub fn validate_debt_title(title: &str) -> ValidationResult<()> {
    validate_required_text("title", title, 200)
}

/// Validates a barcode typed by the operator.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits and hyphens only (Code 128 labels may carry letters)
///
/// ## Example
/// ```rust
/// use vendinha_core::validation::validate_barcode;
///
/// assert!(validate_barcode("7894900011517").is_ok());
/// assert!(validate_barcode("78 949").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 50,
        });
    }

    if !barcode.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, digits and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart or invoice quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY whole units
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add Item                                                         │
/// │                                                                         │
/// │  Operator enters quantity: 0.5 (kg)                                     │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(500 milli) ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── qty <= 0?   → Error: "quantity must be positive"              │
/// │       ├── qty > 999?  → Error: "quantity must be between ..."           │
/// │       └── OK → line is inserted or merged                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > Quantity::from_units(MAX_ITEM_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a selling price or cost.
///
/// Zero is allowed (giveaways, unknown cost).
///
/// ## Example
/// ```rust
/// use vendinha_core::validation::validate_price;
/// use vendinha_core::money::Money;
///
/// assert!(validate_price("price", Money::from_cents(299)).is_ok());
/// assert!(validate_price("price", Money::zero()).is_ok());
/// assert!(validate_price("price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a receivable settlement. A client can only pay a positive amount.
pub fn validate_settlement_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "settlement amount".to_string(),
        });
    }

    Ok(())
}

/// Validates the amount of a manually entered store debt.
///
/// Any non-zero amount is accepted.
pub fn validate_debt_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_zero() {
        return Err(ValidationError::MustNotBeZero {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines) before a new line is added.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_product_name("Pão Francês (kg)").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());

        assert!(validate_client_name("Maria Souza").is_ok());
        assert!(validate_client_name("  ").is_err());

        assert!(validate_debt_title("DAS MEI").is_ok());
        assert!(validate_debt_title("").is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("7894900011517").is_ok());
        assert!(validate_barcode("ABC-123").is_ok());

        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("12 34").is_err());
        assert!(validate_barcode(&"1".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Quantity::from_units(1)).is_ok());
        assert!(validate_quantity(Quantity::from_milli(250)).is_ok());
        assert!(validate_quantity(Quantity::from_units(999)).is_ok());

        assert!(validate_quantity(Quantity::zero()).is_err());
        assert!(validate_quantity(Quantity::from_units(-1)).is_err());
        assert!(validate_quantity(Quantity::from_units(1000)).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_settlement_amount(Money::from_cents(2000)).is_ok());
        assert!(validate_settlement_amount(Money::zero()).is_err());

        assert!(validate_debt_amount(Money::from_cents(7600)).is_ok());
        assert!(validate_debt_amount(Money::zero()).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  coca ").unwrap(), "coca");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
