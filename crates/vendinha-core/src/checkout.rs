//! # Checkout Processor
//!
//! Commits a cart into a [`Sale`] and applies its stock and ledger effects.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit(cart, method, paid)                                             │
//! │                                                                         │
//! │  ── validate (nothing is touched yet) ───────────────────────────────   │
//! │  1. cart empty?                       → EmptyCart                       │
//! │  2. CASH and paid < total?            → InsufficientPayment             │
//! │  3. negative stock forbidden and      → InsufficientStock               │
//! │     some line exceeds its stock?                                        │
//! │                                                                         │
//! │  ── build ───────────────────────────────────────────────────────────   │
//! │  4. change = CASH ? paid - total : 0                                    │
//! │  5. Sale snapshot (id v7, now, client name or "NI", lines, total)       │
//! │                                                                         │
//! │  ── apply ───────────────────────────────────────────────────────────   │
//! │  6. stock -= qty for every line        (missing product: skipped)       │
//! │  7. DEBT: client.balance -= total                                       │
//! │  8. sales.push(sale)                                                    │
//! │  9. cart.reset()                       (empty, client "0")              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 6-9 cannot fail, so a sale is either reflected in full or not at
//! all.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cart::CartAggregator;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{CatalogStore, LedgerStore};
use crate::types::{PaymentMethod, Sale};
use crate::{new_id, DEFAULT_UNIDENTIFIED_LABEL};

/// Stock rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// When false, a line asking for more than the product's stock fails the
    /// whole checkout with `InsufficientStock`.
    pub allow_negative_stock: bool,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        CheckoutPolicy {
            allow_negative_stock: true,
        }
    }
}

/// Turns carts into sales.
#[derive(Debug, Clone)]
pub struct CheckoutProcessor {
    policy: CheckoutPolicy,
    unidentified_label: String,
}

impl CheckoutProcessor {
    pub fn new(policy: CheckoutPolicy) -> Self {
        CheckoutProcessor {
            policy,
            unidentified_label: DEFAULT_UNIDENTIFIED_LABEL.to_string(),
        }
    }

    /// Name written on sales whose client id does not resolve.
    pub fn with_unidentified_label(mut self, label: impl Into<String>) -> Self {
        self.unidentified_label = label.into();
        self
    }

    pub fn policy(&self) -> CheckoutPolicy {
        self.policy
    }

    /// Commits the cart for its selected client.
    ///
    /// ## Returns
    /// The appended sale. On error no store and no cart state has changed.
    pub fn commit(
        &self,
        cart: &mut CartAggregator,
        method: PaymentMethod,
        paid_amount: Money,
        catalog: &mut CatalogStore,
        ledger: &mut LedgerStore,
    ) -> CoreResult<Sale> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = cart.total();

        if method == PaymentMethod::Cash && paid_amount < total {
            return Err(CoreError::InsufficientPayment {
                total,
                paid: paid_amount,
            });
        }

        if !self.policy.allow_negative_stock {
            self.check_stock(cart, catalog)?;
        }

        let change = match method {
            PaymentMethod::Cash => paid_amount - total,
            _ => Money::zero(),
        };

        let client_id = cart.selected_client().to_string();
        let client_name = ledger
            .client(&client_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| self.unidentified_label.clone());

        let sale = Sale {
            id: new_id(),
            timestamp: Utc::now(),
            client_id: client_id.clone(),
            client_name,
            items: cart.items().to_vec(),
            total,
            payment_method: method,
            amount_paid: paid_amount,
            change,
        };

        for line in cart.items() {
            match catalog.get_mut(&line.product_id) {
                Some(product) => {
                    product.stock -= line.quantity;
                    if product.stock.is_negative() {
                        warn!(
                            product_id = %product.id,
                            stock = %product.stock,
                            "Stock went negative at checkout"
                        );
                    }
                }
                None => {
                    debug!(product_id = %line.product_id, "Product missing from catalog, stock left unchanged");
                }
            }
        }

        if method == PaymentMethod::Debt {
            match ledger.client_mut(&client_id) {
                Some(client) => {
                    client.balance -= total;
                    info!(client_id = %client_id, balance = %client.balance, "Sale charged to client");
                }
                None => {
                    warn!(client_id = %client_id, "Debt sale for unknown client, no balance changed");
                }
            }
        }

        ledger.push_sale(sale.clone());
        cart.reset();

        info!(
            sale_id = %sale.id,
            total = %sale.total,
            method = %sale.payment_method,
            items = sale.items.len(),
            "Sale committed"
        );

        Ok(sale)
    }

    fn check_stock(&self, cart: &CartAggregator, catalog: &CatalogStore) -> CoreResult<()> {
        for line in cart.items() {
            if let Some(product) = catalog.get(&line.product_id) {
                if product.stock < line.quantity {
                    return Err(CoreError::InsufficientStock {
                        product: product.name.clone(),
                        available: product.stock,
                        requested: line.quantity,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for CheckoutProcessor {
    fn default() -> Self {
        Self::new(CheckoutPolicy::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
