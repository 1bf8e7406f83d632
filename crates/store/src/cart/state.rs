//! Cart reducer.
//!
//! Everything in this module is pure: no storage, no logging, no
//! notifications. A mutation takes the current lines, an action, and the
//! stock ceiling the caller resolved for the product, and returns an outcome
//! tag describing what happened.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfcart_core::{Product, ProductId};

/// One product-quantity pairing within the cart.
///
/// Lines only come out of the reducer or out of [`CartState::from_lines`],
/// both of which guarantee `quantity >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    product_id: ProductId,
    title: String,
    unit_price: Decimal,
    quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stock_ceiling: Option<u32>,
}

impl CartLine {
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Price captured when the line was first added.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Ceiling known at the last mutation of this line.
    #[must_use]
    pub const fn stock_ceiling(&self) -> Option<u32> {
        self.stock_ceiling
    }

    /// `unit_price * quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }

    fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A mutation request against the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add `quantity` units of `product`, merging with an existing line.
    Add { product: Product, quantity: i64 },
    /// Delete the line for a product.
    Remove(ProductId),
    /// Set a line to an absolute quantity. Zero or below removes it.
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    /// Delete every line.
    Clear,
}

/// What a [`CartAction`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    /// A new line was created with the full requested quantity.
    Added {
        product_id: ProductId,
        title: String,
        quantity: u32,
    },
    /// A new line was created, but the stock ceiling cut the quantity.
    AddedClamped {
        product_id: ProductId,
        title: String,
        requested: i64,
        quantity: u32,
    },
    /// An existing line grew by the full requested amount.
    Updated {
        product_id: ProductId,
        title: String,
        quantity: u32,
    },
    /// An existing line changed, but the stock ceiling cut the result.
    UpdatedClamped {
        product_id: ProductId,
        title: String,
        requested: i64,
        quantity: u32,
    },
    /// The line is already at the stock ceiling; nothing changed.
    StockExhausted {
        product_id: ProductId,
        title: String,
        quantity: u32,
    },
    /// The ceiling is zero. `removed` is set when an existing line was dropped.
    OutOfStock {
        product_id: ProductId,
        title: String,
        removed: bool,
    },
    /// The requested quantity is not positive, or exceeds `u32::MAX` with
    /// no stock ceiling to clamp it; nothing changed.
    InvalidQuantity {
        product_id: ProductId,
        title: String,
        requested: i64,
    },
    /// The change would push the cart total past `Decimal::MAX`; nothing
    /// changed.
    TotalOverflow {
        product_id: ProductId,
        title: String,
        requested: i64,
    },
    /// A line was deleted.
    Removed { product_id: ProductId, title: String },
    /// A line was set to the requested quantity.
    QuantitySet {
        product_id: ProductId,
        title: String,
        quantity: u32,
    },
    /// A line was set, but lower than requested because of the ceiling.
    QuantityReduced {
        product_id: ProductId,
        title: String,
        requested: i64,
        quantity: u32,
    },
    /// The line already had the requested quantity.
    Unchanged { product_id: ProductId, quantity: u32 },
    /// No line exists for the product; nothing changed.
    NotInCart { product_id: ProductId },
    /// All lines were deleted.
    Cleared { removed_lines: usize },
}

impl CartOutcome {
    /// Whether the lines were modified and need persisting.
    #[must_use]
    pub const fn changes_state(&self) -> bool {
        match self {
            Self::Added { .. }
            | Self::AddedClamped { .. }
            | Self::Updated { .. }
            | Self::UpdatedClamped { .. }
            | Self::Removed { .. }
            | Self::QuantitySet { .. }
            | Self::QuantityReduced { .. } => true,
            Self::OutOfStock { removed, .. } => *removed,
            Self::Cleared { removed_lines } => *removed_lines > 0,
            Self::StockExhausted { .. }
            | Self::InvalidQuantity { .. }
            | Self::TotalOverflow { .. }
            | Self::Unchanged { .. }
            | Self::NotInCart { .. } => false,
        }
    }
}

/// Read-only view of the cart with derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub count: u64,
}

/// The ordered list of cart lines.
///
/// Insertion order is display order. `total` and `count` are computed from
/// the lines on every call. The sum of line totals always fits in a
/// `Decimal`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
}

/// Clamp a requested quantity to `[0, ceiling]`.
///
/// Without a ceiling, returns `None` when the request does not fit in a `u32`.
fn clamp_quantity(requested: i64, ceiling: Option<u32>) -> Option<u32> {
    match ceiling {
        Some(ceiling) => {
            Some(u32::try_from(requested.clamp(0, i64::from(ceiling))).unwrap_or(ceiling))
        }
        None => u32::try_from(requested.max(0)).ok(),
    }
}

/// Sum of `price * quantity`, or `None` on overflow.
fn checked_total(items: impl IntoIterator<Item = (Decimal, u32)>) -> Option<Decimal> {
    items.into_iter().try_fold(Decimal::ZERO, |acc, (price, quantity)| {
        acc.checked_add(price.checked_mul(Decimal::from(quantity))?)
    })
}

impl CartState {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from previously persisted lines.
    ///
    /// Lines with a zero quantity, a negative price, a product ID already
    /// seen earlier in the list, or a total that would overflow the cart
    /// total are dropped. Returns the cart and the number of dropped lines.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> (Self, usize) {
        let before = lines.len();
        let mut seen = HashSet::with_capacity(before);
        let mut running = Decimal::ZERO;
        let lines: Vec<CartLine> = lines
            .into_iter()
            .filter(|line| line.quantity > 0)
            .filter(|line| !line.unit_price.is_sign_negative() || line.unit_price.is_zero())
            .filter(|line| seen.insert(line.product_id.clone()))
            .filter(|line| {
                match line
                    .checked_line_total()
                    .and_then(|total| running.checked_add(total))
                {
                    Some(total) => {
                        running = total;
                        true
                    }
                    None => false,
                }
            })
            .collect();
        let dropped = before - lines.len();
        (Self { lines }, dropped)
    }

    /// Apply `action`, given the stock ceiling for the product it targets.
    ///
    /// `ceiling` is ignored for [`CartAction::Remove`] and
    /// [`CartAction::Clear`].
    pub fn apply(&mut self, action: CartAction, ceiling: Option<u32>) -> CartOutcome {
        match action {
            CartAction::Add { product, quantity } => self.add(&product, quantity, ceiling),
            CartAction::Remove(product_id) => self.remove(&product_id),
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => self.update(product_id, quantity, ceiling),
            CartAction::Clear => {
                let removed_lines = self.lines.len();
                self.lines.clear();
                CartOutcome::Cleared { removed_lines }
            }
        }
    }

    fn add(&mut self, product: &Product, requested: i64, ceiling: Option<u32>) -> CartOutcome {
        let product_id = product.id().clone();
        let (current, title, unit_price) = match self.line(&product_id) {
            Some(line) => (line.quantity, line.title.clone(), line.unit_price),
            None => (0, product.title().to_owned(), product.price()),
        };

        let wanted = i64::from(current).saturating_add(requested);
        let quantity = match clamp_quantity(wanted, ceiling) {
            Some(quantity) if requested > 0 => quantity,
            _ => {
                return CartOutcome::InvalidQuantity {
                    product_id,
                    title,
                    requested,
                };
            }
        };

        if current > 0 && quantity == current {
            return CartOutcome::StockExhausted {
                product_id,
                title,
                quantity,
            };
        }

        if quantity == 0 {
            // A ceiling of zero also drops a line added while stock lasted.
            let removed = current > 0;
            if removed {
                self.lines.retain(|l| l.product_id != product_id);
            }
            return CartOutcome::OutOfStock {
                product_id,
                title,
                removed,
            };
        }

        if self.total_with(&product_id, unit_price, quantity).is_none() {
            return CartOutcome::TotalOverflow {
                product_id,
                title,
                requested,
            };
        }

        let clamped = i64::from(quantity) < wanted;
        if current == 0 {
            self.lines.push(CartLine {
                product_id: product_id.clone(),
                title: title.clone(),
                unit_price,
                quantity,
                stock_ceiling: ceiling,
            });
            return if clamped {
                CartOutcome::AddedClamped {
                    product_id,
                    title,
                    requested,
                    quantity,
                }
            } else {
                CartOutcome::Added {
                    product_id,
                    title,
                    quantity,
                }
            };
        }

        self.set_line(&product_id, quantity, ceiling);
        if clamped {
            CartOutcome::UpdatedClamped {
                product_id,
                title,
                requested: wanted,
                quantity,
            }
        } else {
            CartOutcome::Updated {
                product_id,
                title,
                quantity,
            }
        }
    }

    fn remove(&mut self, product_id: &ProductId) -> CartOutcome {
        match self.lines.iter().position(|l| &l.product_id == product_id) {
            Some(index) => {
                let line = self.lines.remove(index);
                CartOutcome::Removed {
                    product_id: line.product_id,
                    title: line.title,
                }
            }
            None => CartOutcome::NotInCart {
                product_id: product_id.clone(),
            },
        }
    }

    fn update(
        &mut self,
        product_id: ProductId,
        requested: i64,
        ceiling: Option<u32>,
    ) -> CartOutcome {
        let Some((current, title, unit_price)) = self
            .line(&product_id)
            .map(|line| (line.quantity, line.title.clone(), line.unit_price))
        else {
            return CartOutcome::NotInCart { product_id };
        };

        let Some(quantity) = clamp_quantity(requested, ceiling) else {
            return CartOutcome::InvalidQuantity {
                product_id,
                title,
                requested,
            };
        };
        if quantity == 0 {
            return self.remove(&product_id);
        }

        let reduced = i64::from(quantity) < requested;
        if !reduced && quantity == current {
            return CartOutcome::Unchanged {
                product_id,
                quantity,
            };
        }

        if self.total_with(&product_id, unit_price, quantity).is_none() {
            return CartOutcome::TotalOverflow {
                product_id,
                title,
                requested,
            };
        }

        self.set_line(&product_id, quantity, ceiling);
        if reduced {
            CartOutcome::QuantityReduced {
                product_id,
                title,
                requested,
                quantity,
            }
        } else {
            CartOutcome::QuantitySet {
                product_id,
                title,
                quantity,
            }
        }
    }

    fn set_line(&mut self, product_id: &ProductId, quantity: u32, ceiling: Option<u32>) {
        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = quantity;
            line.stock_ceiling = ceiling;
        }
    }

    /// Cart total if the line for `product_id` held `quantity` at `unit_price`.
    fn total_with(
        &self,
        product_id: &ProductId,
        unit_price: Decimal,
        quantity: u32,
    ) -> Option<Decimal> {
        let others = self
            .lines
            .iter()
            .filter(|l| &l.product_id != product_id)
            .map(|l| (l.unit_price, l.quantity));
        checked_total(others.chain(std::iter::once((unit_price, quantity))))
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Quantity of a product in the cart, or 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.line(product_id).map_or(0, CartLine::quantity)
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        checked_total(self.lines.iter().map(|l| (l.unit_price, l.quantity))).unwrap_or(Decimal::MAX)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            total: self.total(),
            count: self.count(),
        }
    }
}
