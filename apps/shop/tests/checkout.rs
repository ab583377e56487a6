//! Checkout through the shop session, including what gets persisted.

mod common;

use std::sync::Arc;

use common::{open, open_default, FakeRecognition, MemoryStorage};
use vendinha_core::{Money, PaymentMethod, Quantity, UNIDENTIFIED_CLIENT_ID};
use vendinha_db::Collection;
use vendinha_shop::{ErrorCode, Shop, ShopConfig};

fn units(n: i64) -> Quantity {
    Quantity::from_units(n)
}

#[tokio::test]
async fn cash_sale_gives_change_and_decrements_stock() {
    let (shop, storage) = open_default().await;

    let total = shop.add_to_cart("1", units(2)).unwrap();
    assert_eq!(total, Money::from_cents(2400));

    let sale = shop
        .checkout(PaymentMethod::Cash, Money::from_cents(3000))
        .await
        .unwrap();

    assert_eq!(sale.total, Money::from_cents(2400));
    assert_eq!(sale.change, Money::from_cents(600));
    assert_eq!(sale.client_id, UNIDENTIFIED_CLIENT_ID);
    assert_eq!(shop.product("1").unwrap().stock, units(22));
    assert_eq!(shop.product("3").unwrap().stock, units(100));
    assert!(shop.cart().is_empty());

    assert_eq!(storage.saves(), vec![Collection::Products, Collection::Sales]);
    let stored = storage.stored();
    assert_eq!(stored.sales.len(), 1);
    assert_eq!(stored.products[0].stock, units(22));
}

#[tokio::test]
async fn underpaid_cash_sale_changes_nothing() {
    let (shop, storage) = open_default().await;
    shop.add_to_cart("1", units(2)).unwrap();

    let err = shop
        .checkout(PaymentMethod::Cash, Money::from_cents(2000))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InsufficientPayment);
    assert_eq!(shop.product("1").unwrap().stock, units(24));
    assert!(shop.sales().is_empty());
    assert_eq!(shop.cart().item_count(), 1);
    assert!(storage.saves().is_empty());

    // Retry with the right amount
    let sale = shop
        .checkout(PaymentMethod::Cash, Money::from_cents(2400))
        .await
        .unwrap();
    assert_eq!(sale.change, Money::zero());
}

#[tokio::test]
async fn debt_sale_charges_selected_client() {
    let (shop, storage) = open_default().await;
    shop.select_client("1").unwrap();
    shop.add_to_cart("1", units(2)).unwrap();

    let sale = shop.checkout(PaymentMethod::Debt, Money::zero()).await.unwrap();

    assert_eq!(sale.client_name, "João Silva");
    assert_eq!(sale.change, Money::zero());
    let joao = shop.clients().into_iter().find(|c| c.id == "1").unwrap();
    assert_eq!(joao.balance, Money::from_cents(-7400));
    assert_eq!(shop.cart().selected_client(), UNIDENTIFIED_CLIENT_ID);

    assert_eq!(
        storage.saves(),
        vec![Collection::Products, Collection::Clients, Collection::Sales]
    );
}

#[tokio::test]
async fn card_sale_leaves_balances_alone() {
    let (shop, _storage) = open_default().await;
    let before = shop.clients();

    shop.select_client("1").unwrap();
    shop.add_to_cart("3", units(1)).unwrap();
    shop.checkout(PaymentMethod::Card, Money::zero()).await.unwrap();

    assert_eq!(shop.clients(), before);
}

#[tokio::test]
async fn unknown_client_cannot_be_selected() {
    let (shop, _storage) = open_default().await;
    let err = shop.select_client("99").unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn counter_barcode_and_weighed_items() {
    let (shop, _storage) = open_default().await;

    let product = shop.add_by_barcode("7894900011517", units(1)).unwrap();
    assert_eq!(product.id, "1");
    let total = shop
        .add_to_cart("2", Quantity::from_decimal(0.5).unwrap())
        .unwrap();
    // 12.00 + 0.5 kg × 15.90
    assert_eq!(total, Money::from_cents(1200 + 795));

    assert!(shop.remove_from_cart("1").is_some());
    assert_eq!(shop.cart().total(), Money::from_cents(795));
}

#[tokio::test]
async fn strict_stock_policy_rejects_overselling() {
    let storage = MemoryStorage::seeded();
    let mut config = ShopConfig::default();
    config.checkout.allow_negative_stock = false;
    let shop = Shop::open(config, storage.clone(), Arc::new(FakeRecognition::default()))
        .await
        .unwrap();

    shop.add_to_cart("1", units(30)).unwrap();
    let err = shop.checkout(PaymentMethod::Card, Money::zero()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InsufficientStock);
    assert_eq!(shop.product("1").unwrap().stock, units(24));
    assert!(storage.saves().is_empty());
}

#[tokio::test]
async fn default_policy_allows_negative_stock() {
    let (shop, _storage) = open_default().await;
    shop.add_to_cart("1", units(30)).unwrap();
    shop.checkout(PaymentMethod::Card, Money::zero()).await.unwrap();
    assert_eq!(shop.product("1").unwrap().stock, units(-6));
}

#[tokio::test]
async fn storage_failure_is_reported() {
    let shop = open(MemoryStorage::failing(), Arc::new(FakeRecognition::default())).await;
    shop.add_to_cart("1", units(1)).unwrap();

    let err = shop.checkout(PaymentMethod::Card, Money::zero()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DatabaseError);
}
