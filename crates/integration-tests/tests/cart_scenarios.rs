//! Integration tests for the cart store.
//!
//! These exercise the store through its public API with in-memory and
//! file-backed storage, checking clamping, removal, totals, and rehydration.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use shelfcart_core::{CurrencyCode, Product};
use shelfcart_integration_tests::{Fixture, pid, product};
use shelfcart_store::{CartOutcome, FileStorage, KeyValueStore};

// =============================================================================
// Stock Clamping
// =============================================================================

#[test]
fn test_add_over_ceiling_clamps_with_adjusted_notice() {
    let fx = Fixture::in_memory(&[("p1", 2)]);
    let mut cart = fx.cart();

    let outcome = cart.add_item(&product("p1", 10), 3);

    assert!(matches!(outcome, CartOutcome::AddedClamped { quantity: 2, .. }));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.get_item_quantity(&pid("p1")), 2);
    assert_eq!(cart.total(), Decimal::new(20, 0));
    assert_eq!(
        fx.messages(),
        ["Only 2 of Product p1 in stock; added 2 instead of 3"]
    );
}

#[test]
fn test_repeat_add_at_ceiling_reports_stock_exhausted() {
    let fx = Fixture::in_memory(&[("p1", 2)]);
    let mut cart = fx.cart();
    cart.add_item(&product("p1", 10), 2);
    let _ = fx.messages();

    let outcome = cart.add_item(&product("p1", 10), 1);

    assert!(matches!(outcome, CartOutcome::StockExhausted { .. }));
    assert_eq!(cart.get_item_quantity(&pid("p1")), 2);
    assert_eq!(
        fx.messages(),
        ["No more Product p1 in stock; your cart already has 2"]
    );
}

#[test]
fn test_out_of_stock_is_blocked() {
    let fx = Fixture::in_memory(&[("p1", 0)]);
    let mut cart = fx.cart();

    let outcome = cart.add_item(&product("p1", 10), 1);

    assert!(matches!(outcome, CartOutcome::OutOfStock { removed: false, .. }));
    assert!(cart.is_empty());
    assert_eq!(fx.messages(), ["Product p1 is out of stock"]);
}

#[test]
fn test_unknown_product_is_unlimited() {
    let fx = Fixture::in_memory(&[]);
    let mut cart = fx.cart();

    cart.add_one(&product("mystery", 1));
    cart.add_item(&product("mystery", 1), 999);

    assert_eq!(cart.get_item_quantity(&pid("mystery")), 1000);
}

#[test]
fn test_add_that_would_overflow_total_is_refused() {
    let fx = Fixture::in_memory(&[]);
    let mut cart = fx.cart();
    let huge = Product::parse(
        "p1",
        "Product p1",
        Decimal::from_i128_with_scale(10i128.pow(20), 0),
        None,
    )
    .unwrap();

    let outcome = cart.add_item(&huge, 1_000_000_000);

    assert!(matches!(outcome, CartOutcome::TotalOverflow { .. }));
    assert_eq!(cart.total(), Decimal::ZERO);
    assert_eq!(cart.snapshot().total, Decimal::ZERO);
    assert_eq!(
        fx.messages(),
        ["Cannot hold 1000000000 × Product p1: the cart total would be too large"]
    );
    assert_eq!(fx.cart().total(), Decimal::ZERO);
}

#[test]
fn test_unbounded_oversized_request_is_not_a_stock_clamp() {
    let fx = Fixture::in_memory(&[]);
    let mut cart = fx.cart();

    let outcome = cart.add_item(&product("p1", 1), i64::from(u32::MAX) + 5);

    assert!(matches!(outcome, CartOutcome::InvalidQuantity { .. }));
    assert!(cart.is_empty());
    assert_eq!(fx.messages(), ["Quantity 4294967300 is too large"]);
}

// =============================================================================
// Update / Remove
// =============================================================================

#[test]
fn test_add_then_update_to_zero() {
    let fx = Fixture::in_memory(&[]);
    let mut cart = fx.cart();
    cart.add_item(&product("p1", 5), 1);

    cart.update_quantity(&pid("p1"), 0);

    assert!(cart.lines().is_empty());
    assert_eq!(cart.get_item_quantity(&pid("p1")), 0);
}

#[test]
fn test_update_to_negative_removes() {
    let fx = Fixture::in_memory(&[]);
    let mut cart = fx.cart();
    cart.add_item(&product("p1", 5), 3);

    cart.update_quantity(&pid("p1"), -5);

    assert!(cart.lines().iter().all(|l| l.product_id() != &pid("p1")));
}

#[test]
fn test_update_reduced_by_ceiling_notifies() {
    let fx = Fixture::in_memory(&[("p1", 3)]);
    let mut cart = fx.cart();
    cart.add_item(&product("p1", 5), 1);
    let _ = fx.messages();

    cart.update_quantity(&pid("p1"), 8);
    cart.update_quantity(&pid("p1"), 2);

    assert_eq!(cart.get_item_quantity(&pid("p1")), 2);
    assert_eq!(
        fx.messages(),
        ["Only 3 of Product p1 in stock; quantity set to 3"]
    );
}

#[test]
fn test_remove_twice_matches_remove_once() {
    let fx = Fixture::in_memory(&[]);
    let mut once = fx.cart();
    once.add_item(&product("p1", 5), 1);
    once.add_item(&product("p2", 5), 1);
    once.remove_item(&pid("p1"));
    let after_once = once.snapshot();

    once.remove_item(&pid("p1"));

    assert_eq!(once.snapshot(), after_once);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_file_backed_cart_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(dir.path()));
    let fx = Fixture::with_storage(storage, &[("p1", 10)]);

    {
        let mut cart = fx.cart();
        cart.add_item(&product("p1", 4), 3);
        cart.add_item(&product("p2", 6), 1);
        cart.update_quantity(&pid("p1"), 2);
    }

    let cart = fx.cart();
    assert_eq!(cart.get_item_quantity(&pid("p1")), 2);
    assert_eq!(cart.get_item_quantity(&pid("p2")), 1);
    assert_eq!(cart.formatted_total(CurrencyCode::USD), "$14.00");

    let ids: Vec<&str> = cart.lines().iter().map(|l| l.product_id().as_str()).collect();
    assert_eq!(ids, ["p1", "p2"]);
}

#[test]
fn test_invalid_json_on_disk_loads_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("shelfcart.cart.json"), "{{{ definitely not json").unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(dir.path()));
    let fx = Fixture::with_storage(storage, &[]);

    let mut cart = fx.cart();
    assert!(cart.is_empty());

    cart.add_one(&product("p1", 1));
    assert_eq!(fx.cart().get_item_quantity(&pid("p1")), 1);
}

#[test]
fn test_persisted_format() {
    let fx = Fixture::in_memory(&[]);
    let mut cart = fx.cart();
    cart.add_item(&product("p1", 5), 2);

    let raw = fx.storage.get("shelfcart:cart").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["version"], 1);
    assert!(value["saved_at"].is_string());
    assert_eq!(value["lines"][0]["product_id"], "p1");
    assert_eq!(value["lines"][0]["quantity"], 2);
    assert_eq!(value["lines"][0]["unit_price"], "5");
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn adds_never_exceed_stock(
        ceiling in 0u32..8,
        quantities in proptest::collection::vec(1i64..6, 1..20),
    ) {
        let fx = Fixture::in_memory(&[("p1", ceiling)]);
        let mut cart = fx.cart();

        for quantity in quantities {
            cart.add_item(&product("p1", 3), quantity);
            prop_assert!(cart.get_item_quantity(&pid("p1")) <= ceiling);
        }
    }

    #[test]
    fn total_is_sum_of_lines(
        adds in proptest::collection::vec((0usize..4, 1i64..5, 0i64..50), 0..20),
    ) {
        let fx = Fixture::in_memory(&[]);
        let mut cart = fx.cart();

        for (i, quantity, price) in adds {
            cart.add_item(&product(&format!("p{i}"), price), quantity);
        }

        let expected: Decimal = cart
            .lines()
            .iter()
            .map(|l| l.unit_price() * Decimal::from(l.quantity()))
            .sum();
        prop_assert_eq!(cart.total(), expected);
    }
}
