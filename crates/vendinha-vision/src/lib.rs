//! # vendinha-vision: Image Recognition
//!
//! Resolvers that turn a captured image into something the shop can act on,
//! and the recognition collaborators they call.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         vendinha-vision                                 │
//! │                                                                         │
//! │  ┌────────────────────────┐   ┌────────────────────────────────────┐   │
//! │  │ identify               │──►│ barcode                            │   │
//! │  │ ProductIdentification  │   │ BarcodeResolver                    │   │
//! │  │ Resolver → Resolution  │   │ native detector → service fallback │   │
//! │  └───────────┬────────────┘   └──────────────┬─────────────────────┘   │
//! │              │                               │                          │
//! │              ▼                               ▼                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │ service: RecognitionService / BarcodeDetector (traits)          │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │ implemented by                         │
//! │                               ▼                                        │
//! │  ┌─────────────────────┐   ┌──────────────────────────────────────┐   │
//! │  │ gemini: GeminiClient│──►│ schema: InvoiceData, ProductGuess,   │   │
//! │  │ (reqwest)           │   │ parse_barcode_text                   │   │
//! │  └─────────────────────┘   └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoice reconciliation itself lives in `vendinha-core`; this crate only
//! produces the typed [`InvoiceData`] it consumes.

pub mod barcode;
pub mod error;
pub mod gemini;
pub mod identify;
pub mod image;
pub mod schema;
pub mod service;

pub use barcode::BarcodeResolver;
pub use error::{VisionError, VisionResult};
pub use gemini::{GeminiClient, GeminiConfig};
pub use identify::{ProductIdentificationResolver, Resolution};
pub use image::CapturedImage;
pub use schema::{InvoiceData, InvoiceItem, ProductGuess};
pub use service::{BarcodeDetector, DetectedBarcode, RecognitionService, Symbology};
