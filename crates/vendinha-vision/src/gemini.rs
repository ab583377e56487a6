//! # Gemini Client
//!
//! [`RecognitionService`] backed by the Gemini `generateContent` REST call.
//!
//! ```text
//! ┌──────────────┐   POST {endpoint}/models/{model}:generateContent   ┌────────┐
//! │ GeminiClient │ ─────────────────────────────────────────────────► │ Gemini │
//! │              │   inline image + prompt + response schema          │        │
//! │              │ ◄───────────────────────────────────────────────── │        │
//! └──────────────┘   candidates[0].content.parts[].text               └────────┘
//! ```
//!
//! Invoices and product guesses are requested as JSON constrained by a
//! response schema; barcodes as plain text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{VisionError, VisionResult};
use crate::image::CapturedImage;
use crate::schema::{parse_barcode_text, InvoiceData, ProductGuess};
use crate::service::RecognitionService;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for a recognition call (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const INVOICE_INSTRUCTION: &str = "You are an expert data entry assistant for a retail store. \
Analyze the provided image of an invoice or receipt. Extract the total amount, the date, and a \
list of items purchased. For each item, try to identify the product name, the unit cost, and the \
quantity. If the image is not clear, do your best to infer.";
const INVOICE_PROMPT: &str = "Extract invoice data into JSON.";
const IDENTIFY_PROMPT: &str =
    "Identify this product. Provide a short name, a category, and an estimated retail price in BRL.";
const BARCODE_PROMPT: &str = "Read the barcode or UPC number from this image. Return ONLY the \
number digits as a plain string. If no barcode is found, return null.";

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// Without a key every call fails with `MissingApiKey`.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, `None` when it carries no text.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> VisionResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VisionError::RecognitionFailure(format!("Failed to create HTTP client: {e}")))?;
        Ok(GeminiClient { http, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Sends one request and returns the answer text.
    async fn generate(&self, body: Value) -> VisionResult<Option<String>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(VisionError::MissingApiKey)?;

        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.friendly_error(&e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), detail = %detail.trim(), "Recognition request rejected");
            return Err(VisionError::RecognitionFailure(status_error(status)));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| VisionError::RecognitionParse(e.to_string()))?;
        let text = parsed.text();
        debug!(model = %self.config.model, has_text = text.is_some(), "Recognition answered");
        Ok(text)
    }

    async fn generate_json<T: DeserializeOwned>(&self, body: Value) -> VisionResult<Option<T>> {
        match self.generate(body).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn friendly_error(&self, err: &reqwest::Error) -> VisionError {
        if err.is_timeout() {
            return VisionError::Timeout(self.config.timeout.as_secs());
        }
        if err.is_connect() {
            return VisionError::RecognitionFailure("Cannot reach the recognition service".to_string());
        }
        VisionError::RecognitionFailure(format!("Network error: {err}"))
    }
}

fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "Request rejected by the recognition service".to_string(),
        401 | 403 => "Recognition API key is invalid".to_string(),
        429 => "Recognition quota exceeded, try again later".to_string(),
        s if s >= 500 => format!("Recognition service error (HTTP {s})"),
        s => format!("Unexpected response from recognition service (HTTP {s})"),
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

fn image_part(image: &CapturedImage) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type(),
            "data": image.base64_payload(),
        }
    })
}

fn invoice_request(image: &CapturedImage) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": INVOICE_INSTRUCTION }] },
        "contents": [{ "parts": [image_part(image), { "text": INVOICE_PROMPT }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "date": { "type": "STRING", "description": "Date of purchase in YYYY-MM-DD format" },
                    "total": { "type": "NUMBER" },
                    "items": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": { "type": "STRING" },
                                "cost": { "type": "NUMBER" },
                                "quantity": { "type": "NUMBER" }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn identify_request(image: &CapturedImage) -> Value {
    json!({
        "contents": [{ "parts": [image_part(image), { "text": IDENTIFY_PROMPT }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "category": { "type": "STRING" },
                    "estimatedPrice": { "type": "NUMBER" }
                }
            }
        }
    })
}

fn barcode_request(image: &CapturedImage) -> Value {
    json!({
        "contents": [{ "parts": [image_part(image), { "text": BARCODE_PROMPT }] }],
        "generationConfig": { "responseMimeType": "text/plain" }
    })
}

// =============================================================================
// RecognitionService
// =============================================================================

#[async_trait]
impl RecognitionService for GeminiClient {
    async fn analyze_invoice(&self, image: &CapturedImage) -> VisionResult<InvoiceData> {
        image.validate()?;
        self.generate_json(invoice_request(image))
            .await?
            .ok_or(VisionError::RecognitionEmpty)
    }

    async fn identify_product(&self, image: &CapturedImage) -> VisionResult<Option<ProductGuess>> {
        image.validate()?;
        self.generate_json(identify_request(image)).await
    }

    async fn read_barcode(&self, image: &CapturedImage) -> VisionResult<Option<String>> {
        image.validate()?;
        let text = self.generate(barcode_request(image)).await?;
        Ok(text.as_deref().and_then(parse_barcode_text))
    }
}
