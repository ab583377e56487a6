//! # Recognition Collaborators
//!
//! The two capabilities the resolvers are built on:
//!
//! - [`RecognitionService`]: a remote model that reads invoices, names
//!   products and, as a last resort, reads barcodes
//! - [`BarcodeDetector`]: an on-device barcode decoder, which may be absent
//!
//! Both are traits so the shop can run against fakes in tests and against
//! [`crate::gemini::GeminiClient`] in production.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VisionResult;
use crate::image::CapturedImage;
use crate::schema::{InvoiceData, ProductGuess};

/// Remote image recognition.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Reads date, total and line items off an invoice photograph.
    ///
    /// Fails with `RecognitionFailure` when the call itself fails.
    async fn analyze_invoice(&self, image: &CapturedImage) -> VisionResult<InvoiceData>;

    /// Names the product in the photograph. `Ok(None)` when it cannot.
    async fn identify_product(&self, image: &CapturedImage) -> VisionResult<Option<ProductGuess>>;

    /// Reads a barcode as plain digits. `Ok(None)` when there is none.
    async fn read_barcode(&self, image: &CapturedImage) -> VisionResult<Option<String>>;
}

// =============================================================================
// Native Detection
// =============================================================================

/// Barcode formats requested from the on-device detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    QrCode,
    Code128,
}

impl Symbology {
    /// The fixed set the barcode resolver asks for.
    pub const RETAIL: [Symbology; 6] = [
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::QrCode,
        Symbology::Code128,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "ean_13",
            Symbology::Ean8 => "ean_8",
            Symbology::UpcA => "upc_a",
            Symbology::UpcE => "upc_e",
            Symbology::QrCode => "qr_code",
            Symbology::Code128 => "code_128",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One code found by the detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedBarcode {
    pub raw_value: String,
    pub symbology: Symbology,
}

/// On-device barcode decoding.
#[async_trait]
pub trait BarcodeDetector: Send + Sync {
    /// False when the platform has no detector; the resolver then goes
    /// straight to the service.
    fn is_available(&self) -> bool {
        true
    }

    /// Every code found, in detection order.
    async fn detect(
        &self,
        image: &CapturedImage,
        formats: &[Symbology],
    ) -> VisionResult<Vec<DetectedBarcode>>;
}
