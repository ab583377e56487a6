//! # Shop Storage
//!
//! The persistence contract the shop session talks to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup                                                                │
//! │    load_all() ──► each collection read independently                    │
//! │                   absent? → seed default (and write it back)            │
//! │                                                                         │
//! │  After every mutating operation                                         │
//! │    save(CollectionSnapshot::Sales(all_sales)) ──► full replacement      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use vendinha_core::seed::{seed_clients, seed_products, seed_store_debts, ShopData};
use vendinha_core::{Client, Product, Sale, StoreDebt};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::collection::{Collection, CollectionRepository};

/// A complete replacement for one collection.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionSnapshot {
    Products(Vec<Product>),
    Clients(Vec<Client>),
    Sales(Vec<Sale>),
    StoreDebts(Vec<StoreDebt>),
}

impl CollectionSnapshot {
    pub fn collection(&self) -> Collection {
        match self {
            CollectionSnapshot::Products(_) => Collection::Products,
            CollectionSnapshot::Clients(_) => Collection::Clients,
            CollectionSnapshot::Sales(_) => Collection::Sales,
            CollectionSnapshot::StoreDebts(_) => Collection::StoreDebts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionSnapshot::Products(v) => v.len(),
            CollectionSnapshot::Clients(v) => v.len(),
            CollectionSnapshot::Sales(v) => v.len(),
            CollectionSnapshot::StoreDebts(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads and saves the shop's collections.
#[async_trait]
pub trait ShopStorage: Send + Sync {
    /// Loads all four collections, seeding the absent ones.
    async fn load_all(&self) -> DbResult<ShopData>;

    /// Replaces one collection in full.
    async fn save(&self, snapshot: CollectionSnapshot) -> DbResult<()>;
}

async fn load_or_seed<T, F>(repo: &CollectionRepository, collection: Collection, seed: F) -> DbResult<Vec<T>>
where
    T: serde::de::DeserializeOwned + Serialize + Send + Sync,
    F: FnOnce() -> Vec<T>,
{
    if let Some(items) = repo.load(collection).await? {
        return Ok(items);
    }

    let items = seed();
    repo.replace(collection, items.as_slice()).await?;
    info!(collection = %collection, count = items.len(), "Collection seeded");
    Ok(items)
}

#[async_trait]
impl ShopStorage for Database {
    async fn load_all(&self) -> DbResult<ShopData> {
        let repo = self.collections();

        let products = load_or_seed(&repo, Collection::Products, seed_products).await?;
        let clients = load_or_seed(&repo, Collection::Clients, seed_clients).await?;
        let sales = load_or_seed(&repo, Collection::Sales, Vec::<Sale>::new).await?;
        let store_debts = load_or_seed(&repo, Collection::StoreDebts, seed_store_debts).await?;

        info!(
            products = products.len(),
            clients = clients.len(),
            sales = sales.len(),
            store_debts = store_debts.len(),
            "Shop data loaded"
        );

        Ok(ShopData {
            products,
            clients,
            sales,
            store_debts,
        })
    }

    async fn save(&self, snapshot: CollectionSnapshot) -> DbResult<()> {
        let repo = self.collections();
        let collection = snapshot.collection();
        match &snapshot {
            CollectionSnapshot::Products(items) => repo.replace(collection, items.as_slice()).await,
            CollectionSnapshot::Clients(items) => repo.replace(collection, items.as_slice()).await,
            CollectionSnapshot::Sales(items) => repo.replace(collection, items.as_slice()).await,
            CollectionSnapshot::StoreDebts(items) => repo.replace(collection, items.as_slice()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use vendinha_core::Money;

    #[tokio::test]
    async fn test_fresh_database_is_seeded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let data = db.load_all().await.unwrap();
        assert_eq!(data, ShopData::seed());

        for collection in Collection::ALL {
            assert!(db.collections().exists(collection).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_saved_collection_survives_reload() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut data = db.load_all().await.unwrap();

        data.clients[1].balance = Money::from_cents(-7400);
        db.save(CollectionSnapshot::Clients(data.clients.clone()))
            .await
            .unwrap();

        let reloaded = db.load_all().await.unwrap();
        assert_eq!(reloaded.clients[1].balance, Money::from_cents(-7400));
        assert_eq!(reloaded.products, data.products);
    }

    #[tokio::test]
    async fn test_each_collection_seeds_independently() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.save(CollectionSnapshot::Products(Vec::new())).await.unwrap();

        let data = db.load_all().await.unwrap();
        // An empty but present collection is not reseeded
        assert!(data.products.is_empty());
        assert_eq!(data.clients.len(), 3);
    }
}
