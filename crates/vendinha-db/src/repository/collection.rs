//! # Collection Repository
//!
//! Reads and replaces whole collections.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  collections                                                            │
//! │  ┌──────────────┬──────────────────────────────┬───────┬─────────────┐  │
//! │  │ key          │ payload (JSON array)         │ count │ updated_at  │  │
//! │  ├──────────────┼──────────────────────────────┼───────┼─────────────┤  │
//! │  │ products     │ [{"id":"1","name":...}, ...] │ 3     │ 2024-...    │  │
//! │  │ clients      │ [...]                        │ 3     │             │  │
//! │  │ sales        │ [...]                        │ 0     │             │  │
//! │  │ storeDebts   │ [...]                        │ 2     │             │  │
//! │  └──────────────┴──────────────────────────────┴───────┴─────────────┘  │
//! │                                                                         │
//! │  load(key)         → None when the row is absent (caller seeds)         │
//! │  replace(key, [])  → upsert of the full payload, never a partial patch  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// The four collections the shop persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Clients,
    Sales,
    StoreDebts,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Products,
        Collection::Clients,
        Collection::Sales,
        Collection::StoreDebts,
    ];

    /// Storage key of the collection.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Clients => "clients",
            Collection::Sales => "sales",
            Collection::StoreDebts => "storeDebts",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Repository for the `collections` table.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CollectionRepository::new(pool);
///
/// let products: Option<Vec<Product>> = repo.load(Collection::Products).await?;
/// repo.replace(Collection::Products, &catalog.snapshot()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    pool: SqlitePool,
}

impl CollectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CollectionRepository { pool }
    }

    /// Loads a collection. `Ok(None)` when it was never written.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> DbResult<Option<Vec<T>>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM collections WHERE key = ?1")
                .bind(collection.key())
                .fetch_optional(&self.pool)
                .await?;

        let Some(payload) = payload else {
            debug!(collection = %collection, "Collection absent");
            return Ok(None);
        };

        let items: Vec<T> = serde_json::from_str(&payload)
            .map_err(|e| DbError::corrupt(collection.key(), e))?;

        debug!(collection = %collection, count = items.len(), "Collection loaded");
        Ok(Some(items))
    }

    /// Replaces a collection with `items`.
    pub async fn replace<T: Serialize>(&self, collection: Collection, items: &[T]) -> DbResult<()> {
        let payload = serde_json::to_string(items).map_err(|e| DbError::Encode {
            collection: collection.key().to_string(),
            reason: e.to_string(),
        })?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO collections (key, payload, item_count, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                item_count = excluded.item_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(collection.key())
        .bind(&payload)
        .bind(items.len() as i64)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(collection = %collection, count = items.len(), "Collection replaced");
        Ok(())
    }

    /// True when the collection has been written at least once.
    pub async fn exists(&self, collection: Collection) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM collections WHERE key = ?1")
            .bind(collection.key())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Stored item count per collection key, for diagnostics.
    pub async fn counts(&self) -> DbResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT key, item_count FROM collections ORDER BY key")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }
}
