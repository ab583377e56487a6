//! # vendinha-core: Pure Business Logic for Vendinha
//!
//! This crate is the **heart** of Vendinha. It contains the transaction and
//! reconciliation engine as plain synchronous code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendinha Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    Shop session (apps/shop)                     │    │
//! │  │    cart ──► checkout        capture ──► identify / reconcile    │    │
//! │  └───────────────┬──────────────────────────────┬──────────────────┘    │
//! │                  │                              │                       │
//! │  ┌───────────────▼──────────────────┐  ┌────────▼──────────────────┐    │
//! │  │   ★ vendinha-core (THIS CRATE) ★ │  │     vendinha-vision       │    │
//! │  │                                  │  │  BarcodeResolver          │    │
//! │  │  CartAggregator                  │◄─┤  ProductIdentification    │    │
//! │  │  CheckoutProcessor               │  │  Gemini client            │    │
//! │  │  CatalogReconciler               │  └───────────────────────────┘    │
//! │  │  CatalogStore / LedgerStore      │                                   │
//! │  │                                  │  ┌───────────────────────────┐    │
//! │  │  NO I/O • NO DATABASE • NO NET   │  │       vendinha-db         │    │
//! │  └──────────────────────────────────┘  │  four JSON collections    │    │
//! │                                        └───────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Client, Sale, StoreDebt, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Stock/cart quantities in thousandths
//! - [`store`] - CatalogStore and LedgerStore, the four collections
//! - [`cart`] - CartAggregator
//! - [`checkout`] - CheckoutProcessor
//! - [`reconcile`] - CatalogReconciler for supplier invoices
//! - [`catalog`] - Manual product registration, price edits, search
//! - [`ledger`] - Receivables and payables
//! - [`reports`] - Sales summaries
//! - [`seed`] - Default data for a fresh install
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Validate, then mutate**: every failure is raised before a store is touched
//! 2. **No I/O**: persistence and recognition are collaborators outside this crate
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use vendinha_core::{CartAggregator, CheckoutProcessor, PaymentMethod, Money, Quantity};
//! use vendinha_core::seed::ShopData;
//!
//! let data = ShopData::seed();
//! let (mut catalog, mut ledger) = data.into_stores();
//!
//! let coke = catalog.get("1").unwrap().clone();
//! let mut cart = CartAggregator::new();
//! cart.add_item(&coke, Quantity::from_units(2)).unwrap();
//!
//! let sale = CheckoutProcessor::default()
//!     .commit(&mut cart, PaymentMethod::Cash, Money::from_cents(3000), &mut catalog, &mut ledger)
//!     .unwrap();
//!
//! assert_eq!(sale.change, Money::from_cents(600));
//! assert_eq!(catalog.get("1").unwrap().stock, Quantity::from_units(22));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ledger;
pub mod money;
pub mod quantity;
pub mod reconcile;
pub mod reports;
pub mod seed;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendinha_core::Money` instead of
// `use vendinha_core::money::Money`

pub use cart::CartAggregator;
pub use catalog::{ProductDraft, ProductOffer};
pub use checkout::{CheckoutPolicy, CheckoutProcessor};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::ClientDraft;
pub use money::Money;
pub use quantity::Quantity;
pub use reconcile::{CatalogReconciler, Invoice, InvoiceLine, ReconcileReport};
pub use store::{CatalogStore, LedgerStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Id of the distinguished "unidentified" client.
///
/// Always present in the clients collection; the cart falls back to it
/// after every checkout.
pub const UNIDENTIFIED_CLIENT_ID: &str = "0";

/// Client name written on a sale when the client id cannot be resolved.
pub const DEFAULT_UNIDENTIFIED_LABEL: &str = "NI";

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity (whole units) of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Selling price of a product created from an invoice line: cost × 1.5.
pub const INVOICE_MARKUP_BPS: u32 = 15_000;

/// Cost of a product created from an image guess: estimated price × 0.6.
pub const ESTIMATED_COST_BPS: u32 = 6_000;

/// Generates an id for a new record.
///
/// UUID v7 is time-ordered, so ids of sales and debts sort by creation.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
