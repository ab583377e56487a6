//! # Catalog Reconciler
//!
//! Merges a supplier invoice, already extracted from a photograph, into the
//! product catalog and records what the shop now owes.
//!
//! ## Reconciliation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice { date?, total?, lines: [{ name, cost, quantity }] }           │
//! │       │                                                                 │
//! │       ▼  for each line, in input order                                  │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │ first product where                                              │   │
//! │  │   lower(product.name) contains lower(line.name)                  │   │
//! │  │   OR lower(line.name) contains lower(product.name)               │   │
//! │  └───────────────┬──────────────────────────────┬───────────────────┘   │
//! │            found │                              │ none                  │
//! │                  ▼                              ▼                       │
//! │     cost  = line.cost              new product:                         │
//! │     stock += line.quantity           cost  = line.cost                  │
//! │                                      price = line.cost × 1.5            │
//! │                                      stock = line.quantity, unit "un"   │
//! │       │                                                                 │
//! │       ▼  after the last line                                            │
//! │  StoreDebt "Compra (Nota <date|Hoje>)", amount = total or 0,            │
//! │            due now, unpaid, not recurring, proof image attached         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are applied one by one with no rollback. The only failures are
//! raised while validating the invoice, before the first line is applied.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::store::{CatalogStore, LedgerStore};
use crate::types::{Product, StoreDebt, Unit};
use crate::validation::{validate_price, validate_product_name};
use crate::{new_id, INVOICE_MARKUP_BPS};

/// Placeholder used in the debt title when the invoice has no date.
pub const TODAY_PLACEHOLDER: &str = "Hoje";

// =============================================================================
// Invoice
// =============================================================================

/// One line of a supplier invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub name: String,
    pub cost: Money,
    pub quantity: Quantity,
}

/// A supplier invoice after it has been read off the photograph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Date as printed on the invoice. Kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,

    pub items: Vec<InvoiceLine>,
}

impl Invoice {
    /// Title of the payable recorded for this invoice.
    pub fn debt_title(&self) -> String {
        let date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(TODAY_PLACEHOLDER);
        format!("Compra (Nota {})", date)
    }
}

// =============================================================================
// Report
// =============================================================================

/// What happened to one invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "productId")]
pub enum LineOutcome {
    /// An existing product had its cost replaced and stock increased.
    Updated(String),
    /// A new product was appended to the catalog.
    Created(String),
}

/// Summary of a reconciliation, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub lines: Vec<LineOutcome>,
    pub debt_id: String,
    pub debt_amount: Money,
}

impl ReconcileReport {
    pub fn updated_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, LineOutcome::Updated(_)))
            .count()
    }

    pub fn created_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, LineOutcome::Created(_)))
            .count()
    }
}

// =============================================================================
// Reconciler
// =============================================================================

#[derive(Debug, Clone)]
pub struct CatalogReconciler {
    markup_bps: u32,
}

impl CatalogReconciler {
    pub fn new() -> Self {
        CatalogReconciler {
            markup_bps: INVOICE_MARKUP_BPS,
        }
    }

    /// Applies the invoice to the catalog and appends one store debt.
    ///
    /// ## Errors
    /// `Validation` when a line has an empty name, a negative cost or a
    /// non-positive quantity. Nothing is applied in that case.
    pub fn reconcile(
        &self,
        invoice: &Invoice,
        proof_image: Option<String>,
        catalog: &mut CatalogStore,
        ledger: &mut LedgerStore,
    ) -> CoreResult<ReconcileReport> {
        for line in &invoice.items {
            validate_line(line)?;
        }

        let mut lines = Vec::with_capacity(invoice.items.len());

        for line in &invoice.items {
            let outcome = match find_match(catalog, &line.name) {
                Some(index) => {
                    let Some(product) = catalog.at_mut(index) else {
                        continue;
                    };
                    product.cost = line.cost;
                    product.stock += line.quantity;
                    debug!(
                        product_id = %product.id,
                        cost = %product.cost,
                        stock = %product.stock,
                        "Invoice line matched existing product"
                    );
                    LineOutcome::Updated(product.id.clone())
                }
                None => {
                    let product = Product {
                        id: new_id(),
                        name: line.name.trim().to_string(),
                        price: line.cost.scale_bps(self.markup_bps),
                        cost: line.cost,
                        stock: line.quantity,
                        unit: Unit::Un,
                        barcode: None,
                    };
                    debug!(product_id = %product.id, name = %product.name, "Invoice line created product");
                    let id = product.id.clone();
                    catalog.push(product);
                    LineOutcome::Created(id)
                }
            };
            lines.push(outcome);
        }

        let debt = StoreDebt {
            id: new_id(),
            title: invoice.debt_title(),
            amount: invoice.total.unwrap_or_default(),
            due_date: Utc::now(),
            is_paid: false,
            is_recurring: false,
            proof_image,
        };
        let report = ReconcileReport {
            lines,
            debt_id: debt.id.clone(),
            debt_amount: debt.amount,
        };
        ledger.push_store_debt(debt);

        info!(
            updated = report.updated_count(),
            created = report.created_count(),
            debt_id = %report.debt_id,
            amount = %report.debt_amount,
            "Invoice reconciled"
        );

        Ok(report)
    }
}

impl Default for CatalogReconciler {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_line(line: &InvoiceLine) -> CoreResult<()> {
    validate_product_name(&line.name)?;
    validate_price("cost", line.cost)?;
    if !line.quantity.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Index of the first product whose name contains, or is contained by, the
/// line name (case-insensitive).
fn find_match(catalog: &CatalogStore, line_name: &str) -> Option<usize> {
    let needle = line_name.trim().to_lowercase();
    let mut candidates = catalog.products().iter().enumerate().filter(|(_, p)| {
        let name = p.name.to_lowercase();
        name.contains(&needle) || needle.contains(&name)
    });

    let (index, first) = candidates.next()?;
    let others: Vec<&str> = candidates.map(|(_, p)| p.id.as_str()).collect();
    if !others.is_empty() {
        debug!(
            line = %line_name,
            chosen = %first.id,
            ignored = ?others,
            "Invoice line matched several products, first one wins"
        );
    }
    Some(index)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::seed::ShopData;

    fn line(name: &str, cost_cents: i64, units: i64) -> InvoiceLine {
        InvoiceLine {
            name: name.to_string(),
            cost: Money::from_cents(cost_cents),
            quantity: Quantity::from_units(units),
        }
    }

    #[test]
    fn test_substring_match_updates_cost_and_stock() {
        let (mut catalog, mut ledger) = ShopData::seed().into_stores();
        let invoice = Invoice {
            date: Some("10/11/2023".to_string()),
            total: Some(Money::from_cents(8000)),
            items: vec![line("coca", 800, 10)],
        };

        let report = CatalogReconciler::new()
            .reconcile(&invoice, None, &mut catalog, &mut ledger)
            .unwrap();

        let coke = catalog.get("1").unwrap();
        assert_eq!(coke.cost, Money::from_cents(800));
        assert_eq!(coke.stock, Quantity::from_units(34));
        assert_eq!(coke.price, Money::from_cents(1200));
        assert_eq!(catalog.len(), 3);
        assert_eq!(report.lines, vec![LineOutcome::Updated("1".to_string())]);
    }

    #[test]
    fn test_reverse_containment_matches() {
        let (mut catalog, mut ledger) = ShopData::seed().into_stores();
        let invoice = Invoice {
            items: vec![line("CX DETERGENTE YPÊ 500ML", 150, 24)],
            ..Invoice::default()
        };

        CatalogReconciler::new()
            .reconcile(&invoice, None, &mut catalog, &mut ledger)
            .unwrap();

        let detergent = catalog.get("3").unwrap();
        assert_eq!(detergent.cost, Money::from_cents(150));
        assert_eq!(detergent.stock, Quantity::from_units(124));
    }

    #[test]
    fn test_unmatched_line_creates_product() {
        let (mut catalog, mut ledger) = ShopData::seed().into_stores();
        let invoice = Invoice {
            items: vec![line("Arroz Tio João 5kg", 2199, 5)],
            ..Invoice::default()
        };

        let report = CatalogReconciler::new()
            .reconcile(&invoice, None, &mut catalog, &mut ledger)
            .unwrap();

        assert_eq!(catalog.len(), 4);
        let rice = &catalog.products()[3];
        assert_eq!(rice.name, "Arroz Tio João 5kg");
        assert_eq!(rice.cost, Money::from_cents(2199));
        // 21.99 × 1.5 = 32.985 → 32.99
        assert_eq!(rice.price, Money::from_cents(3299));
        assert_eq!(rice.stock, Quantity::from_units(5));
        assert_eq!(rice.unit, Unit::Un);
        assert!(rice.barcode.is_none());
        assert_eq!(report.created_count(), 1);
    }

    #[test]
    fn test_lines_applied_in_order() {
        let (mut catalog, mut ledger) = ShopData::seed().into_stores();
        // Second line matches the product created by the first one
        let invoice = Invoice {
            items: vec![line("Sabão em Pó", 1000, 2), line("sabão", 1100, 3)],
            ..Invoice::default()
        };

        let report = CatalogReconciler::new()
            .reconcile(&invoice, None, &mut catalog, &mut ledger)
            .unwrap();

        assert_eq!(report.created_count(), 1);
        assert_eq!(report.updated_count(), 1);
        let soap = &catalog.products()[3];
        assert_eq!(soap.cost, Money::from_cents(1100));
        assert_eq!(soap.stock, Quantity::from_units(5));
        assert_eq!(soap.price, Money::from_cents(1500));
    }

    #[test]
    fn test_debt_is_appended() {
        let (mut catalog, mut ledger) = ShopData::seed().into_stores();
        let debts_before = ledger.store_debts().len();
        let invoice = Invoice {
            date: None,
            total: None,
            items: vec![line("coca", 800, 1)],
        };

        let report = CatalogReconciler::new()
            .reconcile(
                &invoice,
                Some("data:image/jpeg;base64,AAAA".to_string()),
                &mut catalog,
                &mut ledger,
            )
            .unwrap();

        assert_eq!(ledger.store_debts().len(), debts_before + 1);
        let debt = ledger.store_debt(&report.debt_id).unwrap();
        assert_eq!(debt.title, "Compra (Nota Hoje)");
        assert_eq!(debt.amount, Money::zero());
        assert!(!debt.is_paid);
        assert!(!debt.is_recurring);
        assert_eq!(debt.proof_image.as_deref(), Some("data:image/jpeg;base64,AAAA"));
    }

    #[test]
    fn test_first_match_wins() {
        let (mut catalog, mut ledger) = ShopData::seed().into_stores();
        let mut products = catalog.snapshot();
        let mut big = products[0].clone();
        big.id = "9".to_string();
        big.name = "Coca Cola 600ml".to_string();
        products.push(big);
        catalog.replace(products);

        CatalogReconciler::new()
            .reconcile(
                &Invoice {
                    items: vec![line("coca cola", 900, 1)],
                    ..Invoice::default()
                },
                None,
                &mut catalog,
                &mut ledger,
            )
            .unwrap();

        assert_eq!(catalog.get("1").unwrap().cost, Money::from_cents(900));
        assert_eq!(catalog.get("9").unwrap().cost, Money::from_cents(750));
    }

    #[test]
    fn test_invalid_line_applies_nothing() {
        let (mut catalog, mut ledger) = ShopData::seed().into_stores();
        let before = catalog.snapshot();
        let invoice = Invoice {
            items: vec![line("coca", 800, 10), line("  ", 100, 1)],
            ..Invoice::default()
        };

        let err = CatalogReconciler::new()
            .reconcile(&invoice, None, &mut catalog, &mut ledger)
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(catalog.snapshot(), before);
        assert_eq!(ledger.store_debts().len(), 2);
    }
}
