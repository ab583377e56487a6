//! # Captured Images
//!
//! A photograph handed over by the capture subsystem, kept as a base64
//! data URL so it can be stored as-is as the proof image of a payable.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::error::{VisionError, VisionResult};

const DATA_URL_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";
const DEFAULT_MIME: &str = "image/jpeg";

/// Image subtypes whose data URL header is recognised and stripped.
const KNOWN_SUBTYPES: [&str; 4] = ["png", "jpeg", "jpg", "webp"];

/// An image as captured, either a `data:image/...;base64,` URL or bare base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data: String,
}

impl CapturedImage {
    pub fn new(data: impl Into<String>) -> Self {
        CapturedImage { data: data.into() }
    }

    /// Wraps raw file bytes into a data URL.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        let encoded = BASE64_STANDARD.encode(bytes);
        CapturedImage {
            data: format!("data:{};base64,{}", mime_type, encoded),
        }
    }

    /// The image exactly as captured.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn into_string(self) -> String {
        self.data
    }

    /// Base64 payload without a recognised data URL header.
    pub fn base64_payload(&self) -> &str {
        match self.header_subtype() {
            Some((_, payload)) => payload,
            None => &self.data,
        }
    }

    /// MIME type from the data URL header, `image/jpeg` when absent.
    pub fn mime_type(&self) -> String {
        match self.header_subtype() {
            Some(("jpg", _)) => DEFAULT_MIME.to_string(),
            Some((subtype, _)) => format!("image/{}", subtype),
            None => DEFAULT_MIME.to_string(),
        }
    }

    /// Checks that there is a decodable payload to send.
    pub fn validate(&self) -> VisionResult<()> {
        let payload = self.base64_payload();
        if payload.trim().is_empty() {
            return Err(VisionError::InvalidImage("empty image".to_string()));
        }
        BASE64_STANDARD
            .decode(payload)
            .map_err(|e| VisionError::InvalidImage(e.to_string()))?;
        Ok(())
    }

    fn header_subtype(&self) -> Option<(&str, &str)> {
        let rest = self.data.strip_prefix(DATA_URL_PREFIX)?;
        let (subtype, payload) = rest.split_once(BASE64_MARKER)?;
        KNOWN_SUBTYPES
            .contains(&subtype)
            .then_some((subtype, payload))
    }
}

impl From<String> for CapturedImage {
    fn from(data: String) -> Self {
        CapturedImage::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_header_is_stripped() {
        let image = CapturedImage::new("data:image/png;base64,aGVsbG8=");
        assert_eq!(image.base64_payload(), "aGVsbG8=");
        assert_eq!(image.mime_type(), "image/png");

        let jpg = CapturedImage::new("data:image/jpg;base64,aGVsbG8=");
        assert_eq!(jpg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_bare_base64_passes_through() {
        let image = CapturedImage::new("aGVsbG8=");
        assert_eq!(image.base64_payload(), "aGVsbG8=");
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_unknown_subtype_is_left_alone() {
        let image = CapturedImage::new("data:image/gif;base64,aGVsbG8=");
        assert_eq!(image.base64_payload(), "data:image/gif;base64,aGVsbG8=");
    }

    #[test]
    fn test_from_bytes() {
        let image = CapturedImage::from_bytes(b"hello", "image/webp");
        assert_eq!(image.as_str(), "data:image/webp;base64,aGVsbG8=");
        assert!(image.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(CapturedImage::new("").validate().is_err());
        assert!(CapturedImage::new("data:image/png;base64,").validate().is_err());
        assert!(CapturedImage::new("not base64 at all!").validate().is_err());
    }
}
