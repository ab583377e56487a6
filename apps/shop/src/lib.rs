//! # Vendinha Shop
//!
//! The operator session: wires configuration, storage and recognition
//! around the core engine.
//!
//! ## Module Organization
//! ```text
//! vendinha_shop/
//! ├── lib.rs          ◄─── You are here (startup wiring & logging)
//! ├── config.rs       ◄─── ShopConfig: defaults → shop.toml → VENDINHA_* env
//! ├── session.rs      ◄─── Shop: every operator operation, persist after mutation
//! ├── capture.rs      ◄─── CaptureTracker: one pending capture, stale results dropped
//! └── error.rs        ◄─── ShopError + ErrorCode for display
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod session;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use vendinha_db::{Database, DbConfig};
use vendinha_vision::GeminiClient;

pub use capture::{CaptureKind, CaptureTicket};
pub use config::ShopConfig;
pub use error::{ErrorCode, ErrorReport, ShopError, ShopResult};
pub use session::{Identification, Shop};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vendinha_core=trace` - Trace the core engine only
/// - Default: `info,vendinha=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vendinha=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Opens the production session: SQLite storage and the Gemini client.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Resolve database path (config, env, or platform data dir)           │
/// │  2. Connect to SQLite (WAL) and run pending migrations                  │
/// │  3. Build the Gemini client (timeout from config)                       │
/// │  4. Load the four collections, seeding the absent ones                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn open_shop(config: ShopConfig) -> ShopResult<Shop> {
    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let gemini = GeminiClient::new(config.gemini())?;

    Shop::open(config, Arc::new(db), Arc::new(gemini)).await
}
