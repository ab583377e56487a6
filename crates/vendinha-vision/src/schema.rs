//! # Recognition Schemas
//!
//! Typed payloads returned by the recognition service, and their checks.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service JSON ──► InvoiceData ──► into_invoice() ──► core Invoice       │
//! │                                   │                                     │
//! │                                   ├── items absent    → Empty           │
//! │                                   └── bad name/cost/qty → Parse         │
//! │                                                                         │
//! │  Service JSON ──► ProductGuess ──► normalized() ──► Some / None         │
//! │                                                                         │
//! │  Service text ──► parse_barcode_text() ──► digits / None                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use vendinha_core::{Invoice, InvoiceLine, Money, Quantity};

use crate::error::{VisionError, VisionResult};

// =============================================================================
// Invoice
// =============================================================================

/// One purchased item as read off an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default)]
    pub name: String,
    /// Unit cost.
    pub cost: f64,
    pub quantity: f64,
}

/// An invoice as read off a photograph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvoiceData {
    /// Purchase date, `YYYY-MM-DD` when the service manages to read it.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    /// `None` when the service read no item list at all. An empty list is
    /// still an invoice and records its payable.
    #[serde(default)]
    pub items: Option<Vec<InvoiceItem>>,
}

impl InvoiceData {
    /// Checks the payload and converts it into a core [`Invoice`].
    ///
    /// ## Errors
    /// - `RecognitionEmpty` when the payload carries no item list
    /// - `RecognitionParse` for an empty item name, a negative or non-finite
    ///   cost, a non-positive or non-finite quantity, or a non-finite total
    pub fn into_invoice(self) -> VisionResult<Invoice> {
        let Some(items) = self.items else {
            return Err(VisionError::RecognitionEmpty);
        };

        let total = match self.total {
            Some(value) => Some(Money::from_decimal(value).ok_or_else(|| {
                VisionError::RecognitionParse(format!("invoice total is not a number: {}", value))
            })?),
            None => None,
        };

        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_line(index))
            .collect::<VisionResult<Vec<_>>>()?;

        let date = self
            .date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Invoice { date, total, items })
    }
}

impl InvoiceItem {
    fn into_line(self, index: usize) -> VisionResult<InvoiceLine> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(parse_error(index, "name is empty"));
        }

        let cost = Money::from_decimal(self.cost)
            .filter(|c| !c.is_negative())
            .ok_or_else(|| parse_error(index, &format!("invalid cost {}", self.cost)))?;

        let quantity = Quantity::from_decimal(self.quantity)
            .filter(|q| q.is_positive())
            .ok_or_else(|| parse_error(index, &format!("invalid quantity {}", self.quantity)))?;

        Ok(InvoiceLine {
            name: name.to_string(),
            cost,
            quantity,
        })
    }
}

fn parse_error(index: usize, reason: &str) -> VisionError {
    VisionError::RecognitionParse(format!("item {}: {}", index + 1, reason))
}

// =============================================================================
// Product Guess
// =============================================================================

/// What the service thinks a photographed product is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGuess {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Estimated shelf price in BRL.
    #[serde(default)]
    pub estimated_price: Option<f64>,
}

impl ProductGuess {
    /// Trims the guess; a blank name means there is no guess at all.
    pub fn normalized(self) -> Option<ProductGuess> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(ProductGuess {
            name: name.to_string(),
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            estimated_price: self.estimated_price,
        })
    }

    /// Estimated price as money. Missing, negative or non-finite → zero.
    pub fn estimated_money(&self) -> Money {
        self.estimated_price
            .and_then(Money::from_decimal)
            .filter(|m| !m.is_negative())
            .unwrap_or_default()
    }
}

// =============================================================================
// Barcode
// =============================================================================

/// Reads the plain-text barcode answer.
///
/// Empty or `null` (any case) is no barcode; anything else keeps only its
/// digits.
///
/// ## Example
/// ```rust
/// use vendinha_vision::schema::parse_barcode_text;
///
/// assert_eq!(parse_barcode_text(" 789-1234 \n"), Some("7891234".to_string()));
/// assert_eq!(parse_barcode_text("NULL"), None);
/// ```
pub fn parse_barcode_text(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return None;
    }
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    (!digits.is_empty()).then_some(digits)
}
