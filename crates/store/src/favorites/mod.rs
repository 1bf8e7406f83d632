//! Favorited products.
//!
//! A [`FavoriteSet`] is a plain set of product IDs with a toggle reducer.
//! [`FavoritesStore`] persists the set after every change and notifies the
//! user of each toggle.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use shelfcart_core::ProductId;
use tracing::instrument;

use crate::notify::Notifier;
use crate::storage::{KeyValueStore, Namespace};

/// Key name of the persisted favorites within a namespace.
pub const FAVORITES_KEY: &str = "favorites";

/// What a favorites mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added(ProductId),
    Removed(ProductId),
    Cleared { removed: usize },
}

/// Set of favorited product IDs.
///
/// Iteration is sorted so the persisted form is stable; callers should not
/// rely on any particular order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<ProductId>,
}

impl FavoriteSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Remove `id` if present, otherwise add it.
    pub fn toggle(&mut self, id: ProductId) -> FavoriteOutcome {
        if self.ids.remove(&id) {
            FavoriteOutcome::Removed(id)
        } else {
            self.ids.insert(id.clone());
            FavoriteOutcome::Added(id)
        }
    }

    pub fn clear(&mut self) -> FavoriteOutcome {
        let removed = self.ids.len();
        self.ids.clear();
        FavoriteOutcome::Cleared { removed }
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ProductId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// The shopper's favorites for one client session.
pub struct FavoritesStore {
    set: FavoriteSet,
    key: String,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .field("set", &self.set)
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Open the favorites for `namespace`, restoring whatever was saved.
    ///
    /// Missing, unreadable, or malformed data yields an empty set.
    pub fn load(
        namespace: &Namespace,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let key = namespace.key(FAVORITES_KEY);
        let set = hydrate(storage.as_ref(), &key);
        Self {
            set,
            key,
            storage,
            notifier,
        }
    }

    /// Add or remove `id` and tell the user which happened.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn toggle_favorite(&mut self, id: &ProductId) -> FavoriteOutcome {
        let outcome = self.set.toggle(id.clone());
        self.persist();
        self.notifier.notify(&outcome.notification());
        outcome
    }

    /// Remove every favorite.
    #[instrument(skip(self))]
    pub fn clear_favorites(&mut self) -> FavoriteOutcome {
        let outcome = self.set.clear();
        if matches!(outcome, FavoriteOutcome::Cleared { removed } if removed > 0) {
            self.persist();
        }
        self.notifier.notify(&outcome.notification());
        outcome
    }

    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.set.contains(id)
    }

    /// Favorited IDs, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.set.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Write the set to storage, deleting the key once it is empty.
    fn persist(&self) {
        let result = if self.set.is_empty() {
            self.storage.remove(&self.key).map_err(|e| e.to_string())
        } else {
            let ids: Vec<&ProductId> = self.set.iter().collect();
            serde_json::to_string(&ids)
                .map_err(|e| e.to_string())
                .and_then(|json| {
                    self.storage
                        .set(&self.key, &json)
                        .map_err(|e| e.to_string())
                })
        };
        if let Err(error) = result {
            tracing::warn!(key = %self.key, %error, "Failed to persist favorites");
        }
    }
}

fn hydrate(storage: &dyn KeyValueStore, key: &str) -> FavoriteSet {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return FavoriteSet::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read saved favorites, starting empty");
            return FavoriteSet::new();
        }
    };

    match serde_json::from_str::<Vec<ProductId>>(&raw) {
        Ok(ids) => {
            let set: FavoriteSet = ids.into_iter().collect();
            tracing::debug!(key, favorites = set.len(), "Favorites restored");
            set
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Saved favorites are malformed, starting empty");
            FavoriteSet::new()
        }
    }
}
