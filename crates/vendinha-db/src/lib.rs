//! # vendinha-db: Persistence Layer for Vendinha
//!
//! Stores the shop's four collections (products, clients, sales,
//! storeDebts) in a local SQLite file, one JSON document per collection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendinha Data Flow                               │
//! │                                                                         │
//! │  Shop session (checkout, reconcile, settle, ...)                        │
//! │       │  after each mutation: save(CollectionSnapshot::...)             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   vendinha-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐   │    │
//! │  │   │   Database    │    │  ShopStorage   │    │  Migrations  │   │    │
//! │  │   │   (pool.rs)   │◄───│  load_all()    │    │  (embedded)  │   │    │
//! │  │   │  SqlitePool   │    │  save()        │    │ 001_coll.sql │   │    │
//! │  │   └───────┬───────┘    └────────────────┘    └──────────────┘   │    │
//! │  │           │                                                     │    │
//! │  │   CollectionRepository: load / replace whole JSON arrays        │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/vendinha/vendinha.db                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The collection repository
//! - [`storage`] - `ShopStorage`, the contract the shop session uses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vendinha_db::{Database, DbConfig, ShopStorage, CollectionSnapshot};
//!
//! let db = Database::new(DbConfig::new("vendinha.db")).await?;
//! let data = db.load_all().await?;     // seeds absent collections
//!
//! db.save(CollectionSnapshot::Sales(ledger.sales_snapshot())).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::collection::{Collection, CollectionRepository};
pub use storage::{CollectionSnapshot, ShopStorage};
