//! Product records as seen by the cart.
//!
//! A [`Product`] is validated when it is built, including when it is
//! deserialized from a catalog file, so downstream code never sees an empty
//! ID or a negative price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, IdError, ProductId};

/// Errors that can occur when building a [`Product`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The product ID is invalid.
    #[error("invalid product id: {0}")]
    InvalidId(#[from] IdError),
    /// The price is below zero.
    #[error("price cannot be negative (got {0})")]
    NegativePrice(Decimal),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct")]
pub struct Product {
    id: ProductId,
    title: String,
    price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<CategoryId>,
}

/// Unvalidated wire shape of a product.
#[derive(Deserialize)]
struct RawProduct {
    id: ProductId,
    #[serde(default, alias = "name")]
    title: String,
    price: Decimal,
    #[serde(default, alias = "countInStock", alias = "stock_ceiling")]
    stock: Option<u32>,
    #[serde(default)]
    category: Option<CategoryId>,
}

impl TryFrom<RawProduct> for Product {
    type Error = ProductError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.title, raw.price, raw.stock).map(|p| p.with_category(raw.category))
    }
}

impl Product {
    /// Create a product.
    ///
    /// An empty title falls back to the product ID.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::NegativePrice`] if `price` is below zero.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Decimal,
        stock: Option<u32>,
    ) -> Result<Self, ProductError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ProductError::NegativePrice(price));
        }

        let title = title.into();
        let title = if title.trim().is_empty() {
            id.as_str().to_owned()
        } else {
            title
        };

        Ok(Self {
            id,
            title,
            price,
            stock,
            category: None,
        })
    }

    /// Parse the ID and build a product in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is invalid or the price is negative.
    pub fn parse(
        id: &str,
        title: impl Into<String>,
        price: Decimal,
        stock: Option<u32>,
    ) -> Result<Self, ProductError> {
        Self::new(ProductId::parse(id)?, title, price, stock)
    }

    /// Attach a category.
    #[must_use]
    pub fn with_category(mut self, category: Option<CategoryId>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unit price in the store currency.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Stock ceiling carried on the record itself, if known.
    #[must_use]
    pub const fn stock(&self) -> Option<u32> {
        self.stock
    }

    #[must_use]
    pub const fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }
}
