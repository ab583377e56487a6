//! Receivables, payables and a full round trip through SQLite.

mod common;

use std::sync::Arc;

use common::{image, open_default, FakeRecognition};
use vendinha_core::{ClientDraft, Money, PaymentMethod, ProductDraft, Quantity, Unit};
use vendinha_db::{Collection, Database, DbConfig, ShopStorage};
use vendinha_shop::{CaptureKind, ErrorCode, Shop, ShopConfig};

#[tokio::test]
async fn settling_a_receivable_reduces_what_is_owed() {
    let (shop, storage) = open_default().await;
    assert_eq!(shop.dashboard().total_receivable, Money::from_cents(5000));

    let balance = shop.settle_receivable("1", Money::from_cents(2000)).await.unwrap();

    assert_eq!(balance, Money::from_cents(-3000));
    assert_eq!(shop.debtors().len(), 1);
    assert_eq!(shop.dashboard().total_receivable, Money::from_cents(3000));
    assert_eq!(storage.saves(), vec![Collection::Clients]);
}

#[tokio::test]
async fn registered_client_can_buy_on_credit() {
    let (shop, _storage) = open_default().await;

    let client = shop
        .register_client(ClientDraft {
            name: "Ana Lima".to_string(),
            phone: Some("11977776666".to_string()),
            cpf: None,
            address: None,
        })
        .await
        .unwrap();
    assert_eq!(client.balance, Money::zero());

    shop.select_client(&client.id).unwrap();
    shop.add_to_cart("3", Quantity::from_units(2)).unwrap();
    shop.checkout(PaymentMethod::Debt, Money::zero()).await.unwrap();

    let debtors = shop.debtors();
    assert!(debtors.iter().any(|c| c.id == client.id && c.balance == Money::from_cents(-598)));
}

#[tokio::test]
async fn payables_are_added_and_paid_once() {
    let (shop, storage) = open_default().await;
    assert_eq!(shop.dashboard().total_payable, Money::from_cents(7600));

    let debt = shop.add_store_debt("Aluguel", Money::from_cents(120000)).await.unwrap();
    assert_eq!(shop.dashboard().total_payable, Money::from_cents(127600));

    shop.mark_debt_paid(&debt.id).await.unwrap();
    assert_eq!(shop.dashboard().total_payable, Money::from_cents(7600));

    let err = shop.mark_debt_paid(&debt.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::BusinessLogic);
    assert_eq!(storage.saves(), vec![Collection::StoreDebts, Collection::StoreDebts]);
}

#[tokio::test]
async fn manual_registration_and_price_edit() {
    let (shop, _storage) = open_default().await;

    let product = shop
        .register_product(ProductDraft {
            name: "Queijo Minas".to_string(),
            price: Money::from_cents(3490),
            cost: Some(Money::from_cents(2200)),
            stock: Quantity::from_units(5),
            unit: Unit::Kg,
            barcode: None,
        })
        .await
        .unwrap();
    assert!(product.barcode.is_some());

    shop.add_to_cart(&product.id, Quantity::from_units(1)).unwrap();
    shop.update_price(&product.id, Money::from_cents(3990)).await.unwrap();

    // The cart keeps the price it was created with
    assert_eq!(shop.cart().total(), Money::from_cents(3490));
    assert_eq!(shop.product(&product.id).unwrap().price, Money::from_cents(3990));
}

#[tokio::test]
async fn sqlite_storage_survives_a_restart() {
    let db = Arc::new(Database::new(DbConfig::in_memory()).await.unwrap());
    let recognition = Arc::new(FakeRecognition::with_invoice(
        &[("detergente", 1.5, 12.0)],
        Some(18.0),
        Some("10/06/2024"),
    ));

    let shop = Shop::open(ShopConfig::default(), db.clone(), recognition.clone())
        .await
        .unwrap();
    shop.add_to_cart("1", Quantity::from_units(1)).unwrap();
    shop.checkout(PaymentMethod::Cash, Money::from_cents(1500)).await.unwrap();
    let ticket = shop.begin_capture(CaptureKind::Invoice);
    shop.scan_invoice(ticket, image()).await.unwrap();
    let before = shop.data();
    drop(shop);

    let stored = db.load_all().await.unwrap();
    assert_eq!(stored, before);
    assert_eq!(stored.sales.len(), 1);
    assert_eq!(stored.products[2].stock, Quantity::from_units(112));

    let reopened = Shop::open(ShopConfig::default(), db, recognition).await.unwrap();
    assert_eq!(reopened.sales().len(), 1);
    assert_eq!(reopened.product("1").unwrap().stock, Quantity::from_units(23));
}
