//! Integration tests for Shelfcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shelfcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart store behaviour over real storage backends
//! - `favorites_scenarios` - Favorites store behaviour and persistence
//!
//! This library holds the fixtures shared by the test files.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use shelfcart_core::{Product, ProductId};
use shelfcart_store::{
    CartStore, FavoritesStore, KeyValueStore, MemoryStorage, Namespace, RecordingNotifier,
};

/// Parse a product ID, panicking on invalid input.
///
/// # Panics
///
/// Panics if `id` is not a valid product ID.
#[must_use]
pub fn pid(id: &str) -> ProductId {
    ProductId::parse(id).unwrap_or_else(|e| panic!("invalid test id {id:?}: {e}"))
}

/// Build a product priced in whole currency units.
///
/// # Panics
///
/// Panics if `id` is not a valid product ID or `price` is negative.
#[must_use]
pub fn product(id: &str, price: i64) -> Product {
    Product::parse(id, format!("Product {id}"), Decimal::new(price, 0), None)
        .unwrap_or_else(|e| panic!("invalid test product {id:?}: {e}"))
}

/// Shared storage, notifier, and stock levels for opening stores.
pub struct Fixture {
    pub storage: Arc<dyn KeyValueStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub stock: Arc<HashMap<ProductId, u32>>,
    pub namespace: Namespace,
}

impl Fixture {
    /// In-memory fixture with the given stock ceilings.
    #[must_use]
    pub fn in_memory(stock: &[(&str, u32)]) -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()), stock)
    }

    #[must_use]
    pub fn with_storage(storage: Arc<dyn KeyValueStore>, stock: &[(&str, u32)]) -> Self {
        Self {
            storage,
            notifier: Arc::new(RecordingNotifier::new()),
            stock: Arc::new(stock.iter().map(|&(id, n)| (pid(id), n)).collect()),
            namespace: Namespace::default(),
        }
    }

    #[must_use]
    pub fn cart(&self) -> CartStore {
        CartStore::load(
            &self.namespace,
            self.stock.clone(),
            self.storage.clone(),
            self.notifier.clone(),
        )
    }

    #[must_use]
    pub fn favorites(&self) -> FavoritesStore {
        FavoritesStore::load(&self.namespace, self.storage.clone(), self.notifier.clone())
    }

    /// Drain notification messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifier
            .take()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }
}
