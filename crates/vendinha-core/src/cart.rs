//! # Cart Aggregator
//!
//! The in-progress sale: its lines, its computed total and the client it
//! will be charged to.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Method                  Cart Change           │
//! │  ───────────────          ──────                  ───────────           │
//! │                                                                         │
//! │  Scan / pick product ───► add_item() ──────────► push line, or          │
//! │                                                  qty += n on the        │
//! │                                                  existing line          │
//! │                                                                         │
//! │  Click Remove ──────────► remove_item() ───────► line dropped (no-op    │
//! │                                                  if absent)             │
//! │                                                                         │
//! │  Pick client ───────────► select_client() ─────► selected_client = id   │
//! │                                                                         │
//! │  Checkout succeeded ────► reset() ─────────────► empty, client "0"      │
//! │                                                                         │
//! │  NOTE: total() is recomputed from the lines on every call.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id
//! - `total() == Σ line.subtotal`
//! - `line.subtotal == line.quantity × line.price`, with `line.price` frozen
//!   when the line was first inserted

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreResult;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{CartItem, Product};
use crate::validation::{validate_cart_size, validate_quantity};
use crate::UNIDENTIFIED_CLIENT_ID;

/// The shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAggregator {
    items: Vec<CartItem>,
    selected_client: String,
}

impl CartAggregator {
    /// Creates an empty cart for the unidentified client.
    pub fn new() -> Self {
        CartAggregator {
            items: Vec::new(),
            selected_client: UNIDENTIFIED_CLIENT_ID.to_string(),
        }
    }

    /// Adds a product to the cart or increases its quantity if already present.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity grows, subtotal is recomputed
    ///   from the line's frozen price (not the live catalog price)
    /// - Product not in cart: a new line is appended with the product's
    ///   current price
    ///
    /// ## Errors
    /// `Validation` for a non-positive quantity, a line above
    /// `MAX_ITEM_QUANTITY`, or a cart already holding `MAX_CART_ITEMS` lines.
    pub fn add_item(&mut self, product: &Product, quantity: Quantity) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = line.quantity + quantity;
            validate_quantity(new_qty)?;

            line.quantity = new_qty;
            line.subtotal = line.price.multiply_quantity(new_qty);

            debug!(product_id = %product.id, quantity = %new_qty, "Cart line increased");
            return Ok(());
        }

        validate_cart_size(self.items.len())?;
        self.items.push(CartItem::from_product(product, quantity));

        debug!(product_id = %product.id, quantity = %quantity, "Cart line added");
        Ok(())
    }

    /// Fails when a new line would not fit, so callers can check before
    /// creating the product the line is for.
    pub fn ensure_room(&self) -> CoreResult<()> {
        validate_cart_size(self.items.len())?;
        Ok(())
    }

    /// Removes the line for a product id. No-op if absent.
    ///
    /// Returns the removed line, if there was one.
    pub fn remove_item(&mut self, product_id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Sum of all line subtotals.
    pub fn total(&self) -> Money {
        self.items.iter().map(|i| i.subtotal).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn selected_client(&self) -> &str {
        &self.selected_client
    }

    /// Sets the client the sale will be charged to.
    ///
    /// The id is not checked here; checkout falls back to the unidentified
    /// label when it does not resolve.
    pub fn select_client(&mut self, client_id: impl Into<String>) {
        self.selected_client = client_id.into();
    }

    /// Removes all lines, keeping the selected client.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Removes all lines and selects the unidentified client again.
    pub fn reset(&mut self) {
        self.items.clear();
        self.selected_client = UNIDENTIFIED_CLIENT_ID.to_string();
    }
}

impl Default for CartAggregator {
    fn default() -> Self {
        Self::new()
    }
}
