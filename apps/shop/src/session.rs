//! # Shop Session
//!
//! One operator, one [`Shop`]. It owns the catalog, the ledger and the cart,
//! runs every operation through `vendinha-core`, and hands the changed
//! collections to [`ShopStorage`] after each mutation.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(method, paid)                                                 │
//! │     │                                                                   │
//! │     ├── lock state ── CheckoutProcessor::commit ── snapshots ── unlock  │
//! │     │                                                                   │
//! │     └── save(products) → save(clients)* → save(sales)                   │
//! │                                              * DEBT sales only          │
//! │                                                                         │
//! │  scan_invoice(ticket, image)                                            │
//! │     │                                                                   │
//! │     ├── analyze_invoice (await, no lock held)                           │
//! │     ├── ticket still active? no → StaleCapture, nothing applied         │
//! │     ├── lock state ── CatalogReconciler::reconcile ── unlock            │
//! │     └── save(products) → save(storeDebts)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state lock is never held across an `.await`.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};
use vendinha_core::reports::Dashboard;
use vendinha_core::seed::ShopData;
use vendinha_core::{
    CartAggregator, CartItem, CatalogReconciler, CatalogStore, CheckoutProcessor, Client,
    ClientDraft, CoreError, LedgerStore, Money, PaymentMethod, Product, ProductDraft,
    ProductOffer, Quantity, ReconcileReport, Sale, StoreDebt,
};
use vendinha_db::{CollectionSnapshot, ShopStorage};
use vendinha_vision::{
    BarcodeDetector, BarcodeResolver, CapturedImage, ProductIdentificationResolver,
    RecognitionService, Resolution,
};

use crate::capture::{CaptureKind, CaptureTicket, CaptureTracker};
use crate::config::ShopConfig;
use crate::error::{ShopError, ShopResult};

/// Outcome of a product photograph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Identification {
    /// A catalog product was recognised and one unit added to the cart.
    AddedToCart { product: Product },
    /// Unknown product; pass to [`Shop::accept_offer`] to register it.
    Offer { offer: ProductOffer },
}

#[derive(Debug)]
struct ShopState {
    catalog: CatalogStore,
    ledger: LedgerStore,
    cart: CartAggregator,
}

pub struct Shop {
    state: Mutex<ShopState>,
    storage: Arc<dyn ShopStorage>,
    barcodes: BarcodeResolver,
    identifier: ProductIdentificationResolver,
    captures: CaptureTracker,
    checkout: CheckoutProcessor,
    reconciler: CatalogReconciler,
    config: ShopConfig,
}

impl Shop {
    /// Loads the collections (seeding absent ones) and starts a session.
    pub async fn open(
        config: ShopConfig,
        storage: Arc<dyn ShopStorage>,
        recognition: Arc<dyn RecognitionService>,
    ) -> ShopResult<Self> {
        let data = storage.load_all().await?;
        let (catalog, ledger) = data.into_stores();

        let checkout = CheckoutProcessor::new(config.checkout_policy())
            .with_unidentified_label(config.store.unidentified_label.clone());
        let barcodes = BarcodeResolver::new(recognition);

        info!(
            store = %config.store.name,
            products = catalog.len(),
            clients = ledger.clients().len(),
            "Shop session opened"
        );

        Ok(Shop {
            state: Mutex::new(ShopState {
                catalog,
                ledger,
                cart: CartAggregator::new(),
            }),
            storage,
            identifier: ProductIdentificationResolver::new(barcodes.clone()),
            barcodes,
            captures: CaptureTracker::new(),
            checkout,
            reconciler: CatalogReconciler::new(),
            config,
        })
    }

    /// Uses an on-device barcode detector before the recognition service.
    pub fn with_barcode_detector(mut self, detector: Arc<dyn BarcodeDetector>) -> Self {
        self.barcodes = self.barcodes.with_detector(detector);
        self.identifier = ProductIdentificationResolver::new(self.barcodes.clone());
        self
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    // =========================================================================
    // State Access
    // =========================================================================

    fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ShopState) -> R,
    {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    fn with_state_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ShopState) -> R,
    {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    async fn persist(&self, snapshots: Vec<CollectionSnapshot>) -> ShopResult<()> {
        for snapshot in snapshots {
            let collection = snapshot.collection();
            if let Err(e) = self.storage.save(snapshot).await {
                warn!(collection = %collection, error = %e, "Failed to persist collection");
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Everything as currently held in memory.
    pub fn data(&self) -> ShopData {
        self.with_state(|s| ShopData::from_stores(&s.catalog, &s.ledger))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn cart(&self) -> CartAggregator {
        self.with_state(|s| s.cart.clone())
    }

    /// Adds `quantity` of a catalog product. Returns the new cart total.
    pub fn add_to_cart(&self, product_id: &str, quantity: Quantity) -> ShopResult<Money> {
        self.with_state_mut(|s| {
            let product = s
                .catalog
                .get(product_id)
                .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
            s.cart.add_item(product, quantity)?;
            Ok::<_, ShopError>(s.cart.total())
        })
    }

    /// Adds the product carrying `barcode` (typed or scanned at the counter).
    pub fn add_by_barcode(&self, barcode: &str, quantity: Quantity) -> ShopResult<Product> {
        self.with_state_mut(|s| {
            let product = s
                .catalog
                .find_by_barcode(barcode.trim())
                .cloned()
                .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;
            s.cart.add_item(&product, quantity)?;
            Ok::<_, ShopError>(product)
        })
    }

    pub fn remove_from_cart(&self, product_id: &str) -> Option<CartItem> {
        self.with_state_mut(|s| s.cart.remove_item(product_id))
    }

    /// Selects the client a DEBT sale is charged to.
    pub fn select_client(&self, client_id: &str) -> ShopResult<()> {
        self.with_state_mut(|s| {
            if s.ledger.client(client_id).is_none() {
                return Err(ShopError::from(CoreError::ClientNotFound(client_id.to_string())));
            }
            s.cart.select_client(client_id);
            Ok(())
        })
    }

    pub fn clear_cart(&self) {
        self.with_state_mut(|s| s.cart.clear());
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Commits the cart. On `InsufficientPayment` nothing changes and the
    /// operator can retry with another amount.
    pub async fn checkout(&self, method: PaymentMethod, paid_amount: Money) -> ShopResult<Sale> {
        let (sale, snapshots) = self.with_state_mut(|s| {
            let ShopState {
                catalog,
                ledger,
                cart,
            } = s;
            let sale = self
                .checkout
                .commit(cart, method, paid_amount, catalog, ledger)?;

            let mut snapshots = vec![CollectionSnapshot::Products(catalog.snapshot())];
            if method == PaymentMethod::Debt {
                snapshots.push(CollectionSnapshot::Clients(ledger.clients_snapshot()));
            }
            snapshots.push(CollectionSnapshot::Sales(ledger.sales_snapshot()));
            Ok::<_, ShopError>((sale, snapshots))
        })?;

        self.persist(snapshots).await?;
        Ok(sale)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn products(&self) -> Vec<Product> {
        self.with_state(|s| s.catalog.snapshot())
    }

    pub fn product(&self, product_id: &str) -> Option<Product> {
        self.with_state(|s| s.catalog.get(product_id).cloned())
    }

    pub fn search(&self, term: &str) -> ShopResult<Vec<Product>> {
        self.with_state(|s| {
            let found = s.catalog.search(term)?;
            Ok::<_, ShopError>(found.into_iter().cloned().collect())
        })
    }

    pub fn price_list(&self) -> String {
        self.with_state(|s| s.catalog.price_list(&self.config.store.currency_symbol))
    }

    pub async fn register_product(&self, draft: ProductDraft) -> ShopResult<Product> {
        let (product, snapshot) = self.with_state_mut(|s| {
            let product = s.catalog.register_product(draft)?;
            Ok::<_, ShopError>((product, s.catalog.snapshot()))
        })?;
        self.persist(vec![CollectionSnapshot::Products(snapshot)]).await?;
        Ok(product)
    }

    pub async fn update_price(&self, product_id: &str, price: Money) -> ShopResult<()> {
        let snapshot = self.with_state_mut(|s| {
            s.catalog.update_price(product_id, price)?;
            Ok::<_, ShopError>(s.catalog.snapshot())
        })?;
        self.persist(vec![CollectionSnapshot::Products(snapshot)]).await
    }

    // =========================================================================
    // Clients and Payables
    // =========================================================================

    pub fn clients(&self) -> Vec<Client> {
        self.with_state(|s| s.ledger.clients_snapshot())
    }

    pub fn debtors(&self) -> Vec<Client> {
        self.with_state(|s| s.ledger.debtors().into_iter().cloned().collect())
    }

    pub async fn register_client(&self, draft: ClientDraft) -> ShopResult<Client> {
        let (client, snapshot) = self.with_state_mut(|s| {
            let client = s.ledger.register_client(draft)?;
            Ok::<_, ShopError>((client, s.ledger.clients_snapshot()))
        })?;
        self.persist(vec![CollectionSnapshot::Clients(snapshot)]).await?;
        Ok(client)
    }

    /// Records a payment received from a client. Returns the new balance.
    pub async fn settle_receivable(&self, client_id: &str, amount: Money) -> ShopResult<Money> {
        let (balance, snapshot) = self.with_state_mut(|s| {
            let balance = s.ledger.settle_receivable(client_id, amount)?;
            Ok::<_, ShopError>((balance, s.ledger.clients_snapshot()))
        })?;
        self.persist(vec![CollectionSnapshot::Clients(snapshot)]).await?;
        Ok(balance)
    }

    pub fn store_debts(&self) -> Vec<StoreDebt> {
        self.with_state(|s| s.ledger.store_debts_snapshot())
    }

    pub async fn add_store_debt(&self, title: &str, amount: Money) -> ShopResult<StoreDebt> {
        let (debt, snapshot) = self.with_state_mut(|s| {
            let debt = s.ledger.add_store_debt(title, amount)?;
            Ok::<_, ShopError>((debt, s.ledger.store_debts_snapshot()))
        })?;
        self.persist(vec![CollectionSnapshot::StoreDebts(snapshot)]).await?;
        Ok(debt)
    }

    pub async fn mark_debt_paid(&self, debt_id: &str) -> ShopResult<()> {
        let snapshot = self.with_state_mut(|s| {
            s.ledger.mark_debt_paid(debt_id)?;
            Ok::<_, ShopError>(s.ledger.store_debts_snapshot())
        })?;
        self.persist(vec![CollectionSnapshot::StoreDebts(snapshot)]).await
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn sales(&self) -> Vec<Sale> {
        self.with_state(|s| s.ledger.sales_snapshot())
    }

    pub fn dashboard(&self) -> Dashboard {
        self.with_state(|s| Dashboard::build(&s.ledger))
    }

    // =========================================================================
    // Captures
    // =========================================================================

    /// Starts a capture, superseding any pending one.
    pub fn begin_capture(&self, kind: CaptureKind) -> CaptureTicket {
        self.captures.begin(kind)
    }

    /// The operator dismissed the camera. A late result will be discarded.
    pub fn cancel_capture(&self) {
        self.captures.cancel();
    }

    fn claim(&self, ticket: &CaptureTicket) -> ShopResult<()> {
        if self.captures.complete(ticket) {
            Ok(())
        } else {
            warn!(ticket = ticket.id, kind = %ticket.kind, "Discarding late recognition result");
            Err(ShopError::StaleCapture { ticket: ticket.id })
        }
    }

    /// Reads a supplier invoice and reconciles it into the catalog, then
    /// records the payable with the image as proof.
    pub async fn scan_invoice(
        &self,
        ticket: CaptureTicket,
        image: CapturedImage,
    ) -> ShopResult<ReconcileReport> {
        let result = self.barcodes.service().analyze_invoice(&image).await;
        self.claim(&ticket)?;

        let invoice = result?.into_invoice()?;

        let (report, products, debts) = self.with_state_mut(|s| {
            let report = self.reconciler.reconcile(
                &invoice,
                Some(image.into_string()),
                &mut s.catalog,
                &mut s.ledger,
            )?;
            Ok::<_, ShopError>((
                report,
                s.catalog.snapshot(),
                s.ledger.store_debts_snapshot(),
            ))
        })?;

        info!(
            updated = report.updated_count(),
            created = report.created_count(),
            debt_id = %report.debt_id,
            "Invoice processed"
        );

        self.persist(vec![
            CollectionSnapshot::Products(products),
            CollectionSnapshot::StoreDebts(debts),
        ])
        .await?;
        Ok(report)
    }

    /// Identifies a product photograph. A known product goes straight into
    /// the cart; an unknown one comes back as an offer.
    pub async fn identify_product(
        &self,
        ticket: CaptureTicket,
        image: CapturedImage,
    ) -> ShopResult<Identification> {
        let catalog = self.with_state(|s| s.catalog.clone());
        let result = self.identifier.resolve(&image, &catalog).await;
        self.claim(&ticket)?;

        match result? {
            Resolution::AddToCart { product } => {
                let product = self.with_state_mut(|s| {
                    let live = s.catalog.get(&product.id).cloned().unwrap_or(product);
                    s.cart.add_item(&live, Quantity::from_units(1))?;
                    Ok::<_, ShopError>(live)
                })?;
                Ok(Identification::AddedToCart { product })
            }
            Resolution::OfferRegistration { offer } => Ok(Identification::Offer { offer }),
            Resolution::Unidentified => Err(ShopError::UnidentifiedImage),
        }
    }

    /// Registers an offered product and adds one unit to the cart.
    pub async fn accept_offer(&self, offer: ProductOffer) -> ShopResult<Product> {
        let (product, snapshot) = self.with_state_mut(|s| {
            s.cart.ensure_room()?;
            let product = s.catalog.accept_offer(offer)?;
            s.cart.add_item(&product, Quantity::from_units(1))?;
            Ok::<_, ShopError>((product, s.catalog.snapshot()))
        })?;
        self.persist(vec![CollectionSnapshot::Products(snapshot)]).await?;
        Ok(product)
    }

    /// Reads a barcode for the registration form.
    pub async fn read_barcode(
        &self,
        ticket: CaptureTicket,
        image: CapturedImage,
    ) -> ShopResult<Option<String>> {
        let code = self.barcodes.resolve(&image).await;
        self.claim(&ticket)?;
        Ok(code)
    }
}
