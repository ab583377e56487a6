//! # Stores
//!
//! In-memory owners of the four persisted collections.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogStore                 LedgerStore                               │
//! │  └── products                 ├── clients      (receivables)            │
//! │                               ├── sales        (append-only history)    │
//! │                               └── store_debts  (payables)               │
//! │                                                                         │
//! │  Reads:   borrowed slices, or owned snapshots for persistence           │
//! │  Writes:  targeted mutations used by the core operations,               │
//! │           or whole-collection replace (load from disk)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence is not done here. The caller takes a snapshot after each
//! committed operation and hands the complete collection to its
//! persistence collaborator.

use crate::types::{Client, Product, Sale, StoreDebt};

// =============================================================================
// Catalog Store
// =============================================================================

/// The product catalog. Insertion order is significant: it is the order
/// reconciliation scans for name matches.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
}

impl CatalogStore {
    pub fn new(products: Vec<Product>) -> Self {
        CatalogStore { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Owned copy of the whole collection, for persistence.
    pub fn snapshot(&self) -> Vec<Product> {
        self.products.clone()
    }

    /// Replaces the whole collection.
    pub fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Exact barcode lookup.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(barcode))
    }

    /// Case-insensitive exact name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name_matches(name))
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Option<&mut Product> {
        self.products.get_mut(index)
    }

    pub(crate) fn push(&mut self, product: Product) {
        self.products.push(product);
    }
}

// =============================================================================
// Ledger Store
// =============================================================================

/// Clients, sales history and store debts.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    clients: Vec<Client>,
    sales: Vec<Sale>,
    store_debts: Vec<StoreDebt>,
}

impl LedgerStore {
    pub fn new(clients: Vec<Client>, sales: Vec<Sale>, store_debts: Vec<StoreDebt>) -> Self {
        LedgerStore {
            clients,
            sales,
            store_debts,
        }
    }

    // -------------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub(crate) fn client_mut(&mut self, id: &str) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn push_client(&mut self, client: Client) {
        self.clients.push(client);
    }

    pub fn clients_snapshot(&self) -> Vec<Client> {
        self.clients.clone()
    }

    pub fn replace_clients(&mut self, clients: Vec<Client>) {
        self.clients = clients;
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    /// Sales in commit order (oldest first).
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub(crate) fn push_sale(&mut self, sale: Sale) {
        self.sales.push(sale);
    }

    pub fn sales_snapshot(&self) -> Vec<Sale> {
        self.sales.clone()
    }

    pub fn replace_sales(&mut self, sales: Vec<Sale>) {
        self.sales = sales;
    }

    // -------------------------------------------------------------------------
    // Store debts
    // -------------------------------------------------------------------------

    pub fn store_debts(&self) -> &[StoreDebt] {
        &self.store_debts
    }

    pub fn store_debt(&self, id: &str) -> Option<&StoreDebt> {
        self.store_debts.iter().find(|d| d.id == id)
    }

    pub(crate) fn store_debt_mut(&mut self, id: &str) -> Option<&mut StoreDebt> {
        self.store_debts.iter_mut().find(|d| d.id == id)
    }

    pub(crate) fn push_store_debt(&mut self, debt: StoreDebt) {
        self.store_debts.push(debt);
    }

    pub fn store_debts_snapshot(&self) -> Vec<StoreDebt> {
        self.store_debts.clone()
    }

    pub fn replace_store_debts(&mut self, store_debts: Vec<StoreDebt>) {
        self.store_debts = store_debts;
    }
}
