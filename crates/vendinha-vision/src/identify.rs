//! # Product Identification
//!
//! Turns a photograph of a product into a catalog action.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  image                                                                  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  BarcodeResolver ── code matches a product? ──► AddToCart (stop here)   │
//! │    │ no code / no match                                                 │
//! │    ▼                                                                    │
//! │  identify_product ── nothing ──► Unidentified                           │
//! │    │ guess                                                              │
//! │    ▼                                                                    │
//! │  exact name match? ── yes ──► AddToCart                                 │
//! │    │ no                                                                 │
//! │    ▼                                                                    │
//! │  OfferRegistration (price = estimate, cost = estimate × 0.6,            │
//! │                     stock 1, un, barcode from step 1)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver never mutates the catalog. An offer becomes a product only
//! when the operator accepts it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vendinha_core::{CatalogStore, Product, ProductOffer};

use crate::barcode::BarcodeResolver;
use crate::error::VisionResult;
use crate::image::CapturedImage;

/// What to do with an identified image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum Resolution {
    /// The product is already in the catalog.
    AddToCart { product: Product },
    /// Not in the catalog; the operator may register it.
    OfferRegistration { offer: ProductOffer },
    /// Nothing usable was recognised.
    Unidentified,
}

#[derive(Clone)]
pub struct ProductIdentificationResolver {
    barcodes: BarcodeResolver,
}

impl ProductIdentificationResolver {
    pub fn new(barcodes: BarcodeResolver) -> Self {
        ProductIdentificationResolver { barcodes }
    }

    /// Resolves `image` against `catalog`.
    ///
    /// ## Errors
    /// Only a failing identification call is an error. Barcode problems are
    /// absorbed by the barcode stage.
    pub async fn resolve(&self, image: &CapturedImage, catalog: &CatalogStore) -> VisionResult<Resolution> {
        let code = self.barcodes.resolve(image).await;

        if let Some(product) = code.as_deref().and_then(|c| catalog.find_by_barcode(c)) {
            info!(product_id = %product.id, barcode = ?code, "Image resolved by barcode");
            return Ok(Resolution::AddToCart {
                product: product.clone(),
            });
        }

        let guess = self
            .barcodes
            .service()
            .identify_product(image)
            .await?
            .and_then(|g| g.normalized());

        let Some(guess) = guess else {
            debug!(barcode = ?code, "Image not identified");
            return Ok(Resolution::Unidentified);
        };

        if let Some(product) = catalog.find_by_name(&guess.name) {
            info!(product_id = %product.id, name = %guess.name, "Image resolved by name");
            return Ok(Resolution::AddToCart {
                product: product.clone(),
            });
        }

        let offer = ProductOffer::from_estimate(
            guess.name.clone(),
            guess.category.clone(),
            guess.estimated_money(),
            code,
        );
        info!(name = %offer.name, price = %offer.price, "Image identified as a new product");
        Ok(Resolution::OfferRegistration { offer })
    }
}
