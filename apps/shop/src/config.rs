//! # Shop Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     VENDINHA_DB_PATH=./vendinha.db                                      │
//! │     VENDINHA_GEMINI_API_KEY=...                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/vendinha/shop.toml (Linux)                                │
//! │     ~/Library/Application Support/com.vendinha.shop/shop.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Mercadinho do Zé"
//! currency_symbol = "R$"
//! unidentified_label = "NI"
//!
//! [database]
//! path = "/var/lib/vendinha/vendinha.db"
//!
//! [recognition]
//! api_key = "..."
//! model = "gemini-2.5-flash"
//! timeout_secs = 30
//!
//! [checkout]
//! allow_negative_stock = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vendinha_core::{CheckoutPolicy, Money, DEFAULT_UNIDENTIFIED_LABEL};
use vendinha_vision::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use vendinha_vision::GeminiConfig;

use crate::error::{ShopError, ShopResult};

const CONFIG_FILE: &str = "shop.toml";
const DB_FILE: &str = "vendinha.db";

// =============================================================================
// Sections
// =============================================================================

/// Store identity and display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal places shown for amounts. Money itself is always in cents.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    /// Client name recorded on a sale whose client cannot be found.
    #[serde(default = "default_unidentified_label")]
    pub unidentified_label: String,
}

fn default_store_name() -> String {
    "Vendinha".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

fn default_unidentified_label() -> String {
    DEFAULT_UNIDENTIFIED_LABEL.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            unidentified_label: default_unidentified_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Recognition service (Gemini) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionSettings {
    /// Without a key, invoice scanning and product identification fail.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        RecognitionSettings {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Sell past zero stock. Off: checkout fails with insufficient stock.
    #[serde(default = "default_true")]
    pub allow_negative_stock: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            allow_negative_stock: true,
        }
    }
}

// =============================================================================
// ShopConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub recognition: RecognitionSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl ShopConfig {
    /// Loads defaults, then the config file, then environment overrides.
    pub fn load(config_path: Option<PathBuf>) -> ShopResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading shop config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> ShopResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ShopError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Shop config saved");
        Ok(path)
    }

    pub fn validate(&self) -> ShopResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ShopError::Config("store.name must not be empty".into()));
        }
        if self.store.currency_decimals > 2 {
            return Err(ShopError::Config(format!(
                "store.currency_decimals must be 0, 1 or 2, got {}",
                self.store.currency_decimals
            )));
        }
        if self.store.unidentified_label.trim().is_empty() {
            return Err(ShopError::Config(
                "store.unidentified_label must not be empty".into(),
            ));
        }
        if !self.recognition.endpoint.starts_with("http://")
            && !self.recognition.endpoint.starts_with("https://")
        {
            return Err(ShopError::Config(format!(
                "recognition.endpoint must start with http:// or https://, got: {}",
                self.recognition.endpoint
            )));
        }
        if self.recognition.timeout_secs == 0 {
            return Err(ShopError::Config(
                "recognition.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("VENDINHA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(name) = std::env::var("VENDINHA_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(key) = std::env::var("VENDINHA_GEMINI_API_KEY") {
            debug!("Overriding recognition API key from environment");
            self.recognition.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("VENDINHA_GEMINI_MODEL") {
            self.recognition.model = model;
        }

        if let Ok(timeout) = std::env::var("VENDINHA_GEMINI_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.recognition.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring invalid VENDINHA_GEMINI_TIMEOUT_SECS"),
            }
        }

        if let Ok(allow) = std::env::var("VENDINHA_ALLOW_NEGATIVE_STOCK") {
            match allow.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.checkout.allow_negative_stock = true,
                "0" | "false" | "no" => self.checkout.allow_negative_stock = false,
                _ => warn!(value = %allow, "Ignoring invalid VENDINHA_ALLOW_NEGATIVE_STOCK"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "vendinha", "shop")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Database file, falling back to the platform data directory.
    pub fn database_path(&self) -> ShopResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("com", "vendinha", "shop")
            .ok_or_else(|| ShopError::Config("Could not determine app data directory".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(DB_FILE))
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            allow_negative_stock: self.checkout.allow_negative_stock,
        }
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.recognition.api_key.clone(),
            model: self.recognition.model.clone(),
            endpoint: self.recognition.endpoint.clone(),
            timeout: Duration::from_secs(self.recognition.timeout_secs),
        }
    }

    /// `R$ 12.00`, with as many decimals as configured.
    pub fn format_currency(&self, amount: Money) -> String {
        let decimals = self.store.currency_decimals as usize;
        let sign = if amount.is_negative() { "-" } else { "" };
        let abs = amount.abs();
        let value = match decimals {
            0 => format!("{}", (abs.cents() + 50) / 100),
            1 => {
                let tenths = (abs.cents() + 5) / 10;
                format!("{}.{}", tenths / 10, tenths % 10)
            }
            _ => format!("{}", abs),
        };
        format!("{}{} {}", sign, self.store.currency_symbol, value)
    }
}
