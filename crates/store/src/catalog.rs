//! Product catalog and stock lookup.
//!
//! The cart never owns stock levels. It asks a [`StockLookup`] for the
//! ceiling of a product each time it mutates a line. A `None` answer means
//! the ceiling is unknown and the quantity is left unbounded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use shelfcart_core::{CategoryId, Product, ProductId};
use thiserror::Error;

/// Source of stock ceilings for products.
pub trait StockLookup: Send + Sync {
    /// Maximum purchasable quantity for `id`, or `None` when unknown.
    fn stock_ceiling(&self, id: &ProductId) -> Option<u32>;
}

/// Lookup that knows nothing, so every product is unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl StockLookup for Unlimited {
    fn stock_ceiling(&self, _id: &ProductId) -> Option<u32> {
        None
    }
}

impl StockLookup for HashMap<ProductId, u32> {
    fn stock_ceiling(&self, id: &ProductId) -> Option<u32> {
        self.get(id).copied()
    }
}

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not a valid product list.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an ID.
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// An in-memory product catalog, usually loaded from a JSON file.
///
/// The file is a JSON array of products:
///
/// ```json
/// [
///   { "id": "p1", "title": "Dried Pineapple", "price": "4.50", "stock": 12 },
///   { "id": "p2", "title": "Pineapple Tee", "price": "25.00", "category": "apparel" }
/// ]
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an ID.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id().clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(product.id().clone()));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a catalog from a JSON product array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a product fails
    /// validation, or IDs repeat.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Load a catalog file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    /// All products in file order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products belonging to `category`.
    pub fn in_category<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| p.category() == Some(category))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl StockLookup for Catalog {
    fn stock_ceiling(&self, id: &ProductId) -> Option<u32> {
        self.product(id).and_then(Product::stock)
    }
}
