//! # Seed Data
//!
//! What a fresh install starts with. Each collection falls back to its seed
//! independently when it is missing from storage.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::quantity::Quantity;
use crate::store::{CatalogStore, LedgerStore};
use crate::types::{Client, Product, Sale, StoreDebt, Unit};
use crate::UNIDENTIFIED_CLIENT_ID;

/// The four persisted collections, detached from the stores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopData {
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
    pub sales: Vec<Sale>,
    pub store_debts: Vec<StoreDebt>,
}

impl ShopData {
    /// Demo data for a new shop.
    pub fn seed() -> Self {
        ShopData {
            products: seed_products(),
            clients: seed_clients(),
            sales: Vec::new(),
            store_debts: seed_store_debts(),
        }
    }

    pub fn into_stores(self) -> (CatalogStore, LedgerStore) {
        (
            CatalogStore::new(self.products),
            LedgerStore::new(self.clients, self.sales, self.store_debts),
        )
    }

    pub fn from_stores(catalog: &CatalogStore, ledger: &LedgerStore) -> Self {
        ShopData {
            products: catalog.snapshot(),
            clients: ledger.clients_snapshot(),
            sales: ledger.sales_snapshot(),
            store_debts: ledger.store_debts_snapshot(),
        }
    }
}

pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Coca Cola 2L".to_string(),
            price: Money::from_cents(1200),
            cost: Money::from_cents(750),
            stock: Quantity::from_units(24),
            unit: Unit::Un,
            barcode: Some("7894900011517".to_string()),
        },
        Product {
            id: "2".to_string(),
            name: "Pão Francês (kg)".to_string(),
            price: Money::from_cents(1590),
            cost: Money::from_cents(800),
            stock: Quantity::from_units(50),
            unit: Unit::Kg,
            barcode: None,
        },
        Product {
            id: "3".to_string(),
            name: "Detergente Ypê".to_string(),
            price: Money::from_cents(299),
            cost: Money::from_cents(180),
            stock: Quantity::from_units(100),
            unit: Unit::Un,
            barcode: None,
        },
    ]
}

pub fn seed_clients() -> Vec<Client> {
    vec![
        Client {
            id: UNIDENTIFIED_CLIENT_ID.to_string(),
            name: "NI (Não Identificado)".to_string(),
            balance: Money::zero(),
            phone: None,
            cpf: None,
            address: None,
        },
        Client {
            id: "1".to_string(),
            name: "João Silva".to_string(),
            balance: Money::from_cents(-5000),
            phone: Some("1199999999".to_string()),
            cpf: Some("000.000.000-00".to_string()),
            address: Some("Rua A, 123".to_string()),
        },
        Client {
            id: "2".to_string(),
            name: "Maria Souza".to_string(),
            balance: Money::zero(),
            phone: Some("1188888888".to_string()),
            cpf: None,
            address: None,
        },
    ]
}

pub fn seed_store_debts() -> Vec<StoreDebt> {
    vec![
        StoreDebt {
            id: "1".to_string(),
            title: "DAS MEI".to_string(),
            amount: Money::from_cents(7600),
            due_date: date(2023, 11, 20),
            is_paid: false,
            is_recurring: true,
            proof_image: None,
        },
        StoreDebt {
            id: "2".to_string(),
            title: "Luz (Enel)".to_string(),
            amount: Money::from_cents(25000),
            due_date: date(2023, 11, 15),
            is_paid: true,
            is_recurring: false,
            proof_image: None,
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_contains_unidentified_client() {
        let data = ShopData::seed();
        assert_eq!(data.clients[0].id, UNIDENTIFIED_CLIENT_ID);
        assert_eq!(data.products.len(), 3);
        assert!(data.sales.is_empty());
        assert_eq!(data.store_debts.len(), 2);
    }

    #[test]
    fn test_round_trip_through_stores() {
        let data = ShopData::seed();
        let (catalog, ledger) = data.clone().into_stores();
        assert_eq!(ShopData::from_stores(&catalog, &ledger), data);
    }

    #[test]
    fn test_seed_dates() {
        let debts = seed_store_debts();
        assert_eq!(debts[0].due_date.to_rfc3339(), "2023-11-20T00:00:00+00:00");
    }
}
