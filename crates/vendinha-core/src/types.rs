//! # Domain Types
//!
//! Core domain types used throughout Vendinha.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │      Sale       │   │   StoreDebt     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id             │   │  id (v7)        │   │  id             │        │
//! │  │  name           │   │  client_name ❄  │   │  title          │        │
//! │  │  price / cost   │   │  items ❄        │   │  amount         │        │
//! │  │  stock, unit    │   │  total, change  │   │  is_paid (1-way)│        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Client       │   │    CartItem     │   │ PaymentMethod   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  balance (±)    │   │  product snap ❄ │   │  Cash           │        │
//! │  │  < 0: owes shop │   │  quantity       │   │  Card           │        │
//! │  │  > 0: credit    │   │  subtotal       │   │  Debt (fiado)   │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ❄ = snapshot, frozen at the moment it was taken                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire names are camelCase: these structs are the exact shape of the
//! persisted `products`, `clients`, `sales` and `storeDebts` collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Unit
// =============================================================================

/// How a product is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Sold per piece.
    #[default]
    Un,
    /// Sold by weight.
    Kg,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Un => write!(f, "un"),
            Unit::Kg => write!(f, "kg"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Display name; also the key used by invoice and image matching.
    pub name: String,

    /// Selling price.
    pub price: Money,

    /// Cost price, overwritten by every reconciled invoice line.
    pub cost: Money,

    /// Current stock. No lower bound is enforced here.
    pub stock: Quantity,

    pub unit: Unit,

    /// Barcode (EAN-13, UPC-A, internal 4-digit code, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

impl Product {
    /// Case-insensitive exact name comparison.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

// =============================================================================
// Client
// =============================================================================

/// A client of the shop with a running credit balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,

    /// Negative: the client owes the shop. Positive: the client has credit.
    pub balance: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Brazilian taxpayer id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Client {
    /// True when the client owes the shop money.
    #[inline]
    pub fn is_debtor(&self) -> bool {
        self.balance.is_negative()
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line of the in-progress sale.
///
/// ## Price Freezing
/// `price` is copied from the product when the line is first created.
/// Adding more of the same product later reuses this frozen price, even if
/// the catalog price was edited in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product id at time of adding (frozen).
    #[serde(rename = "id")]
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Selling price at time of adding (frozen).
    pub price: Money,

    /// Cost at time of adding (frozen).
    pub cost: Money,

    pub unit: Unit,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    pub quantity: Quantity,

    /// `quantity × price`, fixed whenever the line is inserted or updated.
    pub subtotal: Money,
}

impl CartItem {
    /// Creates a new line from a product and quantity.
    pub fn from_product(product: &Product, quantity: Quantity) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            cost: product.cost,
            unit: product.unit,
            barcode: product.barcode.clone(),
            quantity,
            subtotal: product.price.multiply_quantity(quantity),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment, may produce change.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Store credit ("fiado"): the total is added to what the client owes.
    Debt,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Debt => write!(f, "debt"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "dinheiro" => Ok(PaymentMethod::Cash),
            "card" | "cartao" | "cartão" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "debt" | "fiado" | "crediario" | "crediário" => Ok(PaymentMethod::Debt),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "payment_method".to_string(),
                reason: format!("unknown payment method '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Created exactly once at checkout and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,

    pub client_id: String,

    /// Client name at time of sale (frozen).
    pub client_name: String,

    /// Cart lines at time of sale (frozen).
    pub items: Vec<CartItem>,

    /// Σ items.subtotal
    pub total: Money,

    pub payment_method: PaymentMethod,

    /// Amount the operator typed as received.
    pub amount_paid: Money,

    /// `amount_paid - total` for cash, zero otherwise.
    pub change: Money,
}

// =============================================================================
// Store Debt (payable)
// =============================================================================

/// Something the shop has to pay: a supplier invoice, a utility bill, a tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDebt {
    pub id: String,
    pub title: String,
    pub amount: Money,
    pub due_date: DateTime<Utc>,
    pub is_paid: bool,
    pub is_recurring: bool,

    /// Base64 data URL of the photographed invoice, when captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn coke() -> Product {
        Product {
            id: "1".to_string(),
            name: "Coca Cola 2L".to_string(),
            price: Money::from_cents(1200),
            cost: Money::from_cents(750),
            stock: Quantity::from_units(24),
            unit: Unit::Un,
            barcode: Some("7894900011517".to_string()),
        }
    }

    #[test]
    fn test_cart_item_snapshot() {
        let item = CartItem::from_product(&coke(), Quantity::from_units(2));
        assert_eq!(item.product_id, "1");
        assert_eq!(item.subtotal, Money::from_cents(2400));
    }

    #[test]
    fn test_product_wire_shape() {
        let json = serde_json::to_value(coke()).unwrap();
        assert_eq!(json["unit"], "un");
        assert_eq!(json["price"], 1200);
        assert_eq!(json["barcode"], "7894900011517");

        let mut no_barcode = coke();
        no_barcode.barcode = None;
        let json = serde_json::to_value(no_barcode).unwrap();
        assert!(json.get("barcode").is_none());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Fiado".parse::<PaymentMethod>().unwrap(), PaymentMethod::Debt);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert!("pix".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_name_matches_ignores_case() {
        assert!(coke().name_matches("coca cola 2l"));
        assert!(!coke().name_matches("coca cola"));
    }
}
