//! # Catalog Operations
//!
//! Manual product maintenance: registration, price edits, search, the
//! printable price list, and accepting a product proposed from an image.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::store::CatalogStore;
use crate::types::{Product, Unit};
use crate::validation::{validate_barcode, validate_price, validate_product_name, validate_search_query};
use crate::{new_id, ESTIMATED_COST_BPS};

/// Attempts at drawing an unused internal barcode before giving up.
const INTERNAL_BARCODE_ATTEMPTS: usize = 32;

// =============================================================================
// Drafts
// =============================================================================

/// Input of the product registration form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: Money,
    /// Defaults to zero when unknown.
    #[serde(default)]
    pub cost: Option<Money>,
    pub stock: Quantity,
    #[serde(default)]
    pub unit: Unit,
    /// Blank or absent: an internal 4-digit code is generated.
    #[serde(default)]
    pub barcode: Option<String>,
}

/// A product the operator may add after an image was identified but not
/// found in the catalog. Nothing is stored until [`CatalogStore::accept_offer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOffer {
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
    pub cost: Money,
    pub stock: Quantity,
    pub unit: Unit,
    pub barcode: Option<String>,
}

impl ProductOffer {
    /// Builds an offer from an estimated shelf price.
    ///
    /// `cost = estimate × 0.6`, `price = estimate`, one unit in stock.
    pub fn from_estimate(
        name: impl Into<String>,
        category: Option<String>,
        estimated_price: Money,
        barcode: Option<String>,
    ) -> Self {
        ProductOffer {
            name: name.into(),
            category,
            price: estimated_price,
            cost: estimated_price.scale_bps(ESTIMATED_COST_BPS),
            stock: Quantity::from_units(1),
            unit: Unit::Un,
            barcode,
        }
    }
}

// =============================================================================
// Catalog Operations
// =============================================================================

impl CatalogStore {
    /// Registers a product typed in by the operator.
    ///
    /// ## Errors
    /// - `Validation` for an empty name, negative price/cost/stock, a
    ///   malformed barcode or a barcode already used by another product
    pub fn register_product(&mut self, draft: ProductDraft) -> CoreResult<Product> {
        validate_product_name(&draft.name)?;
        validate_price("price", draft.price)?;
        let cost = draft.cost.unwrap_or_default();
        validate_price("cost", cost)?;
        if draft.stock.is_negative() {
            return Err(ValidationError::MustNotBeNegative {
                field: "stock".to_string(),
            }
            .into());
        }

        let barcode = match draft.barcode.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                validate_barcode(code)?;
                if self.find_by_barcode(code).is_some() {
                    return Err(ValidationError::Duplicate {
                        field: "barcode".to_string(),
                        value: code.to_string(),
                    }
                    .into());
                }
                code.to_string()
            }
            _ => self.internal_barcode()?,
        };

        let product = Product {
            id: new_id(),
            name: draft.name.trim().to_string(),
            price: draft.price,
            cost,
            stock: draft.stock,
            unit: draft.unit,
            barcode: Some(barcode),
        };

        info!(product_id = %product.id, name = %product.name, "Product registered");
        self.push(product.clone());
        Ok(product)
    }

    /// Appends an accepted [`ProductOffer`] to the catalog.
    ///
    /// The offered barcode is kept only if no other product carries it.
    pub fn accept_offer(&mut self, offer: ProductOffer) -> CoreResult<Product> {
        validate_product_name(&offer.name)?;

        let barcode = offer
            .barcode
            .filter(|code| !code.is_empty() && self.find_by_barcode(code).is_none());

        let product = Product {
            id: new_id(),
            name: offer.name.trim().to_string(),
            price: offer.price,
            cost: offer.cost,
            stock: offer.stock,
            unit: offer.unit,
            barcode,
        };

        info!(product_id = %product.id, name = %product.name, "Product registered from image");
        self.push(product.clone());
        Ok(product)
    }

    /// Manual price edit. Carts and past sales keep their frozen prices.
    pub fn update_price(&mut self, product_id: &str, price: Money) -> CoreResult<()> {
        validate_price("price", price)?;

        let product = self
            .get_mut(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        let old = product.price;
        product.price = price;

        info!(product_id = %product_id, old = %old, new = %price, "Price updated");
        Ok(())
    }

    /// POS search: case-insensitive name substring, or barcode substring.
    ///
    /// An empty term matches nothing.
    pub fn search(&self, term: &str) -> CoreResult<Vec<&Product>> {
        let term = validate_search_query(term)?;
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let needle = term.to_lowercase();

        Ok(self
            .products()
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.barcode.as_deref().is_some_and(|b| b.contains(term.as_str()))
            })
            .collect())
    }

    /// Plain-text price list, one `name: <symbol> price` line per product.
    pub fn price_list(&self, currency_symbol: &str) -> String {
        self.products()
            .iter()
            .map(|p| format!("{}: {} {}", p.name, currency_symbol, p.price))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Draws an unused 4-digit code in 1000..=9999.
    fn internal_barcode(&self) -> CoreResult<String> {
        for _ in 0..INTERNAL_BARCODE_ATTEMPTS {
            let code = (1000 + uuid::Uuid::new_v4().as_u128() % 9000).to_string();
            if self.find_by_barcode(&code).is_none() {
                return Ok(code);
            }
        }
        Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "no free internal code, enter one manually".to_string(),
        }
        .into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::ShopData;

    fn draft(name: &str, barcode: Option<&str>) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Money::from_cents(550),
            cost: None,
            stock: Quantity::from_units(12),
            unit: Unit::Un,
            barcode: barcode.map(str::to_string),
        }
    }

    fn catalog() -> CatalogStore {
        ShopData::seed().into_stores().0
    }

    #[test]
    fn test_register_product_defaults() {
        let mut catalog = catalog();
        let product = catalog.register_product(draft("Leite Integral 1L", None)).unwrap();

        assert_eq!(product.cost, Money::zero());
        let code: u32 = product.barcode.as_deref().unwrap().parse().unwrap();
        assert!((1000..=9999).contains(&code));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_register_product_blank_barcode_is_generated() {
        let mut catalog = catalog();
        let product = catalog.register_product(draft("Leite", Some("  "))).unwrap();
        assert_eq!(product.barcode.unwrap().len(), 4);
    }

    #[test]
    fn test_register_product_rejects_bad_input() {
        let mut catalog = catalog();

        assert!(catalog.register_product(draft("", None)).is_err());
        assert!(catalog
            .register_product(draft("Outra Coca", Some("7894900011517")))
            .is_err());

        let mut negative = draft("Leite", None);
        negative.price = Money::from_cents(-1);
        assert!(catalog.register_product(negative).is_err());

        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_update_price() {
        let mut catalog = catalog();
        catalog.update_price("3", Money::from_cents(349)).unwrap();
        assert_eq!(catalog.get("3").unwrap().price, Money::from_cents(349));

        assert!(matches!(
            catalog.update_price("99", Money::from_cents(1)),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_search() {
        let catalog = catalog();

        let hits = catalog.search("COCA").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        let hits = catalog.search("78949").unwrap();
        assert_eq!(hits[0].id, "1");

        assert!(catalog.search("").unwrap().is_empty());
        assert!(catalog.search("arroz").unwrap().is_empty());
    }

    #[test]
    fn test_price_list() {
        let list = catalog().price_list("R$");
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines[0], "Coca Cola 2L: R$ 12.00");
        assert_eq!(lines[2], "Detergente Ypê: R$ 2.99");
    }

    #[test]
    fn test_offer_from_estimate() {
        let offer = ProductOffer::from_estimate(
            "Biscoito Recheado",
            None,
            Money::from_cents(450),
            Some("7891000100103".to_string()),
        );
        assert_eq!(offer.cost, Money::from_cents(270));
        assert_eq!(offer.price, Money::from_cents(450));
        assert_eq!(offer.stock, Quantity::from_units(1));
        assert_eq!(offer.unit, Unit::Un);

        let mut catalog = catalog();
        let product = catalog.accept_offer(offer).unwrap();
        assert_eq!(product.barcode.as_deref(), Some("7891000100103"));
        assert_eq!(catalog.find_by_barcode("7891000100103").unwrap().id, product.id);
    }
}
