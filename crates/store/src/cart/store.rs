//! Cart store: the reducer plus stock lookup, persistence, and notifications.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfcart_core::{CurrencyCode, Price, Product, ProductId};
use tracing::instrument;

use super::state::{CartAction, CartLine, CartOutcome, CartSnapshot, CartState};
use crate::catalog::StockLookup;
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, Namespace};

/// Key name of the persisted cart within a namespace.
pub const CART_KEY: &str = "cart";

/// Version tag written with every persisted cart.
pub const CART_FORMAT_VERSION: u32 = 1;

/// Stored shape of the cart.
#[derive(Deserialize)]
struct PersistedCart {
    version: u32,
    saved_at: DateTime<Utc>,
    lines: Vec<CartLine>,
}

#[derive(Serialize)]
struct PersistedCartRef<'a> {
    version: u32,
    saved_at: DateTime<Utc>,
    lines: &'a [CartLine],
}

/// The shopper's cart for one client session.
///
/// Owned by the caller and passed by reference to whatever needs it. Every
/// operation returns the [`CartOutcome`] it produced; none of them fail.
/// The stock ceiling for a product comes from the [`StockLookup`] first,
/// then from the product record (or, for quantity updates, the ceiling
/// remembered on the line), and is unlimited when neither knows it.
pub struct CartStore {
    state: CartState,
    key: String,
    saved_at: Option<DateTime<Utc>>,
    stock: Arc<dyn StockLookup>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("saved_at", &self.saved_at)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the cart for `namespace`, restoring whatever was saved.
    ///
    /// Missing, unreadable, or malformed data yields an empty cart.
    pub fn load(
        namespace: &Namespace,
        stock: Arc<dyn StockLookup>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let key = namespace.key(CART_KEY);
        let (state, saved_at) = hydrate(storage.as_ref(), &key);

        Self {
            state,
            key,
            saved_at,
            stock,
            storage,
            notifier,
        }
    }

    /// Add `quantity` units of `product`, clamped to its stock ceiling.
    #[instrument(skip(self, product), fields(product_id = %product.id()))]
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CartOutcome {
        let ceiling = self.ceiling_for(product.id(), product.stock());
        self.dispatch(
            CartAction::Add {
                product: product.clone(),
                quantity,
            },
            ceiling,
        )
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) -> CartOutcome {
        self.add_item(product, 1)
    }

    /// Delete the line for `product_id`. Removing an absent line is a no-op.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_item(&mut self, product_id: &ProductId) -> CartOutcome {
        self.dispatch(CartAction::Remove(product_id.clone()), None)
    }

    /// Set the quantity of a line, clamped to `[0, ceiling]`.
    ///
    /// A clamped quantity of zero removes the line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> CartOutcome {
        let remembered = self
            .state
            .line(product_id)
            .and_then(CartLine::stock_ceiling);
        let ceiling = self.ceiling_for(product_id, remembered);
        self.dispatch(
            CartAction::UpdateQuantity {
                product_id: product_id.clone(),
                quantity,
            },
            ceiling,
        )
    }

    /// Delete every line.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) -> CartOutcome {
        self.dispatch(CartAction::Clear, None)
    }

    /// Quantity of `product_id` in the cart, or 0.
    #[must_use]
    pub fn get_item_quantity(&self, product_id: &ProductId) -> u32 {
        self.state.quantity_of(product_id)
    }

    /// Sum of `unit_price * quantity`, recomputed from the lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.state.total()
    }

    /// Total number of units, recomputed from the lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.state.count()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.snapshot()
    }

    /// Total formatted for display, e.g. `$20.00`.
    #[must_use]
    pub fn formatted_total(&self, currency: CurrencyCode) -> String {
        Price::new(self.total(), currency).display()
    }

    /// When the cart was last written to storage.
    #[must_use]
    pub const fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn ceiling_for(&self, product_id: &ProductId, fallback: Option<u32>) -> Option<u32> {
        let ceiling = self.stock.stock_ceiling(product_id).or(fallback);
        if ceiling.is_none() {
            tracing::debug!(%product_id, "No stock ceiling known, treating as unlimited");
        }
        ceiling
    }

    fn dispatch(&mut self, action: CartAction, ceiling: Option<u32>) -> CartOutcome {
        let outcome = self.state.apply(action, ceiling);
        tracing::debug!(?outcome, ?ceiling, "Cart action applied");

        if outcome.changes_state() {
            self.persist();
        }
        if let Some(notification) = outcome.notification() {
            self.notifier.notify(&notification);
        }

        outcome
    }

    /// Write the lines to storage, or delete the key once the cart is empty.
    /// Failures are logged and otherwise ignored.
    fn persist(&mut self) {
        if self.state.is_empty() {
            match self.storage.remove(&self.key) {
                Ok(()) => self.saved_at = None,
                Err(e) => tracing::warn!(key = %self.key, error = %e, "Failed to delete cart"),
            }
            return;
        }

        let saved_at = Utc::now();
        let persisted = PersistedCartRef {
            version: CART_FORMAT_VERSION,
            saved_at,
            lines: self.state.lines(),
        };

        let json = match serde_json::to_string(&persisted) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to serialize cart");
                return;
            }
        };

        match self.storage.set(&self.key, &json) {
            Ok(()) => self.saved_at = Some(saved_at),
            Err(e) => tracing::warn!(key = %self.key, error = %e, "Failed to persist cart"),
        }
    }
}

/// Read the saved cart under `key`, falling back to an empty cart.
fn hydrate(storage: &dyn KeyValueStore, key: &str) -> (CartState, Option<DateTime<Utc>>) {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No saved cart, starting empty");
            return (CartState::new(), None);
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read saved cart, starting empty");
            return (CartState::new(), None);
        }
    };

    let persisted: PersistedCart = match serde_json::from_str(&raw) {
        Ok(persisted) => persisted,
        Err(e) => {
            tracing::warn!(key, error = %e, "Saved cart is malformed, starting empty");
            return (CartState::new(), None);
        }
    };

    if persisted.version != CART_FORMAT_VERSION {
        tracing::warn!(
            key,
            version = persisted.version,
            "Saved cart has an unsupported version, starting empty"
        );
        return (CartState::new(), None);
    }

    let (state, dropped) = CartState::from_lines(persisted.lines);
    if dropped > 0 {
        tracing::warn!(key, dropped, "Dropped invalid lines from saved cart");
    }
    tracing::debug!(key, lines = state.lines().len(), "Cart restored");

    (state, Some(persisted.saved_at))
}
