//! # Vision Error Types
//!
//! Error types for image recognition.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Recognition Outcomes                                │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Call failed    │  │   Nothing found │  │   Unusable payload      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Recognition    │  │  Recognition    │  │  RecognitionParse       │ │
//! │  │  Failure        │  │  Empty          │  │                         │ │
//! │  │  Timeout        │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │  Captured image │                              │
//! │  │                 │  │                 │                              │
//! │  │  MissingApiKey  │  │  InvalidImage   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed call and an empty answer are kept apart: the operator is told
//! "try again" for the first and offered manual entry for the second.

use thiserror::Error;

/// Result type alias for recognition operations.
pub type VisionResult<T> = Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    // =========================================================================
    // Call Errors
    // =========================================================================
    /// The recognition service could not be reached or answered with an error.
    #[error("Recognition failed: {0}")]
    RecognitionFailure(String),

    /// The recognition call exceeded its deadline.
    #[error("Recognition timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// The service answered, but with nothing usable.
    #[error("Nothing could be recognized in the image")]
    RecognitionEmpty,

    /// The service answered with a payload that does not fit the schema.
    #[error("Malformed recognition payload: {0}")]
    RecognitionParse(String),

    // =========================================================================
    // Input / Configuration Errors
    // =========================================================================
    /// No API key is configured for the recognition service.
    #[error("Recognition API key not configured")]
    MissingApiKey,

    /// The captured image could not be used.
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

impl From<serde_json::Error> for VisionError {
    fn from(err: serde_json::Error) -> Self {
        VisionError::RecognitionParse(err.to_string())
    }
}
