//! # Barcode Resolver
//!
//! Two stages, first success wins:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Native detector (if present)                                        │
//! │       ├── ≥1 code  → first raw value ──────► Some(code) or None (blank) │
//! │       └── absent / error / zero codes                                   │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │  2. Recognition service read_barcode                                    │
//! │       ├── digits   ───────────────────────────────────────► Some(code)  │
//! │       └── none / error ───────────────────────────────────► None        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures never escape: an unreadable barcode is simply `None`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::image::CapturedImage;
use crate::service::{BarcodeDetector, RecognitionService, Symbology};

#[derive(Clone)]
pub struct BarcodeResolver {
    detector: Option<Arc<dyn BarcodeDetector>>,
    service: Arc<dyn RecognitionService>,
}

impl BarcodeResolver {
    pub fn new(service: Arc<dyn RecognitionService>) -> Self {
        BarcodeResolver {
            detector: None,
            service,
        }
    }

    /// Adds an on-device detector, tried before the service.
    pub fn with_detector(mut self, detector: Arc<dyn BarcodeDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn service(&self) -> &Arc<dyn RecognitionService> {
        &self.service
    }

    /// Reads a barcode from the image, `None` if neither stage finds one.
    pub async fn resolve(&self, image: &CapturedImage) -> Option<String> {
        if let Some(code) = self.detect_natively(image).await {
            return code;
        }

        match self.service.read_barcode(image).await {
            Ok(Some(code)) => {
                debug!(code = %code, "Barcode read by recognition service");
                Some(code)
            }
            Ok(None) => {
                debug!("Recognition service found no barcode");
                None
            }
            Err(e) => {
                warn!(error = %e, "Barcode read via recognition service failed");
                None
            }
        }
    }

    /// The first detected code decides. `None` means the native stage had
    /// no answer and the service should be asked.
    async fn detect_natively(&self, image: &CapturedImage) -> Option<Option<String>> {
        let detector = self.detector.as_ref().filter(|d| d.is_available())?;

        match detector.detect(image, &Symbology::RETAIL).await {
            Ok(codes) => {
                let first = codes.into_iter().next()?;
                let code = first.raw_value.trim();
                if code.is_empty() {
                    debug!(symbology = %first.symbology, "Native detector returned a blank value");
                    return Some(None);
                }
                debug!(code = %code, symbology = %first.symbology, "Barcode detected natively");
                Some(Some(code.to_string()))
            }
            Err(e) => {
                warn!(error = %e, "Native barcode detection failed, falling back");
                None
            }
        }
    }
}
