#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vendinha_core::seed::ShopData;
use vendinha_db::{Collection, CollectionSnapshot, DbError, DbResult, ShopStorage};
use vendinha_shop::{Shop, ShopConfig};
use vendinha_vision::{
    CapturedImage, InvoiceData, InvoiceItem, ProductGuess, RecognitionService, VisionError,
    VisionResult,
};

// =============================================================================
// Storage
// =============================================================================

/// In-memory [`ShopStorage`] that records every save.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<ShopData>,
    saves: Mutex<Vec<Collection>>,
    fail_saves: bool,
}

impl MemoryStorage {
    pub fn seeded() -> Arc<Self> {
        Arc::new(MemoryStorage {
            data: Mutex::new(ShopData::seed()),
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(MemoryStorage {
            data: Mutex::new(ShopData::seed()),
            fail_saves: true,
            ..Default::default()
        })
    }

    pub fn stored(&self) -> ShopData {
        self.data.lock().unwrap().clone()
    }

    pub fn saves(&self) -> Vec<Collection> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShopStorage for MemoryStorage {
    async fn load_all(&self) -> DbResult<ShopData> {
        Ok(self.data.lock().unwrap().clone())
    }

    async fn save(&self, snapshot: CollectionSnapshot) -> DbResult<()> {
        if self.fail_saves {
            return Err(DbError::QueryFailed("disk full".into()));
        }
        self.saves.lock().unwrap().push(snapshot.collection());
        let mut data = self.data.lock().unwrap();
        match snapshot {
            CollectionSnapshot::Products(v) => data.products = v,
            CollectionSnapshot::Clients(v) => data.clients = v,
            CollectionSnapshot::Sales(v) => data.sales = v,
            CollectionSnapshot::StoreDebts(v) => data.store_debts = v,
        }
        Ok(())
    }
}

// =============================================================================
// Recognition
// =============================================================================

/// Scripted recognition service.
#[derive(Default)]
pub struct FakeRecognition {
    pub invoice: Option<InvoiceData>,
    pub invoice_fails: bool,
    pub guess: Option<ProductGuess>,
    pub barcode: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeRecognition {
    pub fn with_invoice(items: &[(&str, f64, f64)], total: Option<f64>, date: Option<&str>) -> Self {
        FakeRecognition {
            invoice: Some(InvoiceData {
                date: date.map(str::to_string),
                total,
                items: Some(
                    items
                        .iter()
                        .map(|(name, cost, quantity)| InvoiceItem {
                            name: name.to_string(),
                            cost: *cost,
                            quantity: *quantity,
                        })
                        .collect(),
                ),
            }),
            ..Default::default()
        }
    }

    pub fn with_guess(name: &str, estimated_price: f64, barcode: Option<&str>) -> Self {
        FakeRecognition {
            guess: Some(ProductGuess {
                name: name.to_string(),
                category: None,
                estimated_price: Some(estimated_price),
            }),
            barcode: barcode.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecognitionService for FakeRecognition {
    async fn analyze_invoice(&self, _image: &CapturedImage) -> VisionResult<InvoiceData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.invoice_fails {
            return Err(VisionError::RecognitionFailure("service unavailable".into()));
        }
        Ok(self.invoice.clone().unwrap_or_default())
    }

    async fn identify_product(&self, _image: &CapturedImage) -> VisionResult<Option<ProductGuess>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.guess.clone())
    }

    async fn read_barcode(&self, _image: &CapturedImage) -> VisionResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.barcode.clone())
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub fn image() -> CapturedImage {
    CapturedImage::new("data:image/jpeg;base64,aGVsbG8=")
}

pub async fn open(storage: Arc<MemoryStorage>, recognition: Arc<FakeRecognition>) -> Shop {
    Shop::open(ShopConfig::default(), storage, recognition)
        .await
        .expect("shop opens")
}

pub async fn open_default() -> (Shop, Arc<MemoryStorage>) {
    let storage = MemoryStorage::seeded();
    let shop = open(storage.clone(), Arc::new(FakeRecognition::default())).await;
    (shop, storage)
}
