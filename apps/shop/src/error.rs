//! # Shop Error Type
//!
//! Unified error type for session operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError ───────┐                                                     │
//! │  DbError ─────────┼──► ShopError ──► ErrorReport { code, message }      │
//! │  VisionError ─────┤                      │                              │
//! │  StaleCapture ────┘                      ▼                              │
//! │                                     operator sees one message,          │
//! │                                     the session stays usable            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use vendinha_core::CoreError;
use vendinha_db::DbError;
use vendinha_vision::VisionError;

pub type ShopResult<T> = Result<T, ShopError>;

#[derive(Debug, Error)]
pub enum ShopError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),

    #[error(transparent)]
    Recognition(#[from] VisionError),

    /// Nothing usable came back for a product photograph.
    #[error("Could not identify the product in the image")]
    UnidentifiedImage,

    /// A recognition result arrived after its capture was cancelled or
    /// superseded. Nothing was applied.
    #[error("Capture {ticket} is no longer active, result discarded")]
    StaleCapture { ticket: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ShopError {
    fn from(err: toml::de::Error) -> Self {
        ShopError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ShopError {
    fn from(err: toml::ser::Error) -> Self {
        ShopError::Config(err.to_string())
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientPayment,
    InsufficientStock,
    CartError,
    BusinessLogic,
    RecognitionFailure,
    RecognitionEmpty,
    RecognitionParseError,
    UnidentifiedImage,
    StaleCapture,
    DatabaseError,
    ConfigError,
    Internal,
}

/// What the operator (or a JSON consumer) receives when an operation fails.
///
/// ```json
/// { "code": "INSUFFICIENT_PAYMENT", "message": "Insufficient payment: total 24.00, paid 20.00" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ShopError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ShopError::Core(e) => match e {
                CoreError::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
                CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                CoreError::EmptyCart => ErrorCode::CartError,
                CoreError::ProductNotFound(_)
                | CoreError::ClientNotFound(_)
                | CoreError::DebtNotFound(_) => ErrorCode::NotFound,
                CoreError::DebtAlreadyPaid(_) => ErrorCode::BusinessLogic,
                CoreError::Validation(_) => ErrorCode::ValidationError,
            },
            ShopError::Storage(_) => ErrorCode::DatabaseError,
            ShopError::Recognition(e) => match e {
                VisionError::RecognitionEmpty => ErrorCode::RecognitionEmpty,
                VisionError::RecognitionParse(_) => ErrorCode::RecognitionParseError,
                VisionError::MissingApiKey => ErrorCode::ConfigError,
                VisionError::InvalidImage(_) => ErrorCode::ValidationError,
                VisionError::RecognitionFailure(_) | VisionError::Timeout(_) => {
                    ErrorCode::RecognitionFailure
                }
            },
            ShopError::UnidentifiedImage => ErrorCode::UnidentifiedImage,
            ShopError::StaleCapture { .. } => ErrorCode::StaleCapture,
            ShopError::Config(_) => ErrorCode::ConfigError,
            ShopError::Io(_) => ErrorCode::Internal,
        }
    }

    /// Report for display. Storage details are logged, not shown.
    pub fn report(&self) -> ErrorReport {
        let message = match self {
            ShopError::Storage(e) => {
                tracing::error!(error = %e, "Storage operation failed");
                "Could not save shop data".to_string()
            }
            other => other.to_string(),
        };
        ErrorReport {
            code: self.code(),
            message,
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendinha_core::Money;

    #[test]
    fn test_codes() {
        let err: ShopError = CoreError::InsufficientPayment {
            total: Money::from_cents(2400),
            paid: Money::from_cents(2000),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::InsufficientPayment);

        let err: ShopError = VisionError::RecognitionEmpty.into();
        assert_eq!(err.code(), ErrorCode::RecognitionEmpty);

        let err: ShopError = VisionError::Timeout(30).into();
        assert_eq!(err.code(), ErrorCode::RecognitionFailure);

        assert_eq!(
            ShopError::StaleCapture { ticket: 3 }.code(),
            ErrorCode::StaleCapture
        );
    }

    #[test]
    fn test_report_serialization() {
        let report = ShopError::UnidentifiedImage.report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["code"], "UNIDENTIFIED_IMAGE");
        assert_eq!(json["message"], "Could not identify the product in the image");
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err: ShopError = DbError::QueryFailed("disk I/O error at page 7".into()).into();
        let report = err.report();
        assert_eq!(report.code, ErrorCode::DatabaseError);
        assert!(!report.message.contains("page 7"));
    }
}
