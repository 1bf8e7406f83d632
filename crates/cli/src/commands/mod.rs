//! Subcommand implementations.
//!
//! Each command works against a [`Session`], the composition root that owns
//! the catalog, the file-backed storage, and both stores. Output goes to a
//! caller-supplied writer so commands can be exercised in tests.

use std::io::{self, Write};
use std::sync::Arc;

use shelfcart_core::{ProductError, ProductId};
use shelfcart_store::{
    CartStore, Catalog, CatalogError, FavoritesStore, FileStorage, KeyValueStore,
    NotificationLevel, RecordingNotifier, StoreConfig,
};
use thiserror::Error;

pub mod cart;
pub mod catalog;
pub mod favorites;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog file could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The product is not in the catalog and no price was given.
    #[error("Product {0} is not in the catalog; pass --price to add it anyway")]
    UnknownProduct(ProductId),

    /// Product details given on the command line are invalid.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductError),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

/// Everything a command needs, wired together once per invocation.
pub struct Session {
    pub config: StoreConfig,
    pub catalog: Arc<Catalog>,
    pub cart: CartStore,
    pub favorites: FavoritesStore,
    notifier: Arc<RecordingNotifier>,
}

impl Session {
    /// Load the catalog and open the stores described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured catalog file cannot be loaded.
    pub fn open(config: StoreConfig) -> Result<Self, CommandError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => {
                tracing::debug!("No catalog configured, stock is unlimited");
                Catalog::default()
            }
        };
        let catalog = Arc::new(catalog);
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(&config.data_dir));
        let notifier = Arc::new(RecordingNotifier::new());

        let cart = CartStore::load(
            &config.namespace,
            catalog.clone(),
            storage.clone(),
            notifier.clone(),
        );
        let favorites = FavoritesStore::load(&config.namespace, storage, notifier.clone());

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            namespace = config.namespace.as_str(),
            products = catalog.len(),
            "Session opened"
        );

        Ok(Self {
            config,
            catalog,
            cart,
            favorites,
            notifier,
        })
    }

    /// Write and drain the notifications produced so far.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn flush_notifications(&self, out: &mut impl Write) -> io::Result<()> {
        for notification in self.notifier.take() {
            let label = match notification.level {
                NotificationLevel::Success => "ok",
                NotificationLevel::Info => "info",
                NotificationLevel::Warning => "warning",
                NotificationLevel::Error => "error",
            };
            writeln!(out, "[{label}] {}", notification.message)?;
        }
        Ok(())
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_open_without_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(StoreConfig {
            data_dir: dir.path().to_path_buf(),
            ..StoreConfig::default()
        })
        .unwrap();

        assert!(session.catalog.is_empty());
        assert!(session.cart.is_empty());
        assert!(session.favorites.is_empty());
    }

    #[test]
    fn test_open_with_missing_catalog_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Session::open(StoreConfig {
            data_dir: dir.path().to_path_buf(),
            catalog_path: Some(dir.path().join("missing.json")),
            ..StoreConfig::default()
        });

        assert!(matches!(result, Err(CommandError::Catalog(_))));
    }

    #[test]
    fn test_state_survives_sessions() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = session(dir.path());
            cart::add(&mut session, &pid("p2"), 3, None, None).unwrap();
            favorites::toggle(&mut session, &pid("p1"));
        }

        let session = session(dir.path());
        assert_eq!(session.cart.get_item_quantity(&pid("p2")), 3);
        assert!(session.favorites.is_favorite(&pid("p1")));
    }

    #[test]
    fn test_flush_labels_levels() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        cart::add(&mut session, &pid("p1"), 5, None, None).unwrap();

        assert_eq!(
            notifications(&session),
            "[warning] Only 2 of Dried Pineapple in stock; added 2 instead of 5\n"
        );
        assert_eq!(notifications(&session), "");
    }
}
