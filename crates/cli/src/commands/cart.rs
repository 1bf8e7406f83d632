//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! sc-cli cart show [--json]
//! sc-cli cart add <PRODUCT_ID> [-q N] [--price P --title T]
//! sc-cli cart remove <PRODUCT_ID>
//! sc-cli cart update <PRODUCT_ID> <QUANTITY>
//! sc-cli cart clear
//! ```

use std::io::Write;

use rust_decimal::Decimal;
use shelfcart_core::{Price, Product, ProductId};

use super::{CommandError, Session};

/// Print the cart lines and totals.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn show(session: &Session, json: bool, out: &mut impl Write) -> Result<(), CommandError> {
    let cart = &session.cart;

    if json {
        let body = serde_json::to_string_pretty(&cart.snapshot())?;
        writeln!(out, "{body}")?;
        return Ok(());
    }

    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    let currency = session.config.currency;
    for line in cart.lines() {
        writeln!(
            out,
            "{} × {} [{}] @ {} = {}",
            line.quantity(),
            line.title(),
            line.product_id(),
            Price::new(line.unit_price(), currency),
            Price::new(line.line_total(), currency),
        )?;
    }
    writeln!(out, "Items: {}", cart.count())?;
    writeln!(out, "Total: {}", cart.formatted_total(currency))?;
    if let Some(saved_at) = cart.saved_at() {
        writeln!(out, "Last saved: {}", saved_at.to_rfc3339())?;
    }

    Ok(())
}

/// Add a product to the cart.
///
/// The product comes from the catalog when it is listed there. Otherwise
/// `price` is required and `title` is optional.
///
/// # Errors
///
/// Returns an error if the product is unknown and no price was given, or if
/// the given price is negative.
pub fn add(
    session: &mut Session,
    product_id: &ProductId,
    quantity: i64,
    price: Option<Decimal>,
    title: Option<String>,
) -> Result<(), CommandError> {
    let product = match session.catalog.product(product_id) {
        Some(product) => product.clone(),
        None => {
            let price = price.ok_or_else(|| CommandError::UnknownProduct(product_id.clone()))?;
            tracing::debug!(%product_id, "Adding product missing from catalog");
            Product::new(product_id.clone(), title.unwrap_or_default(), price, None)?
        }
    };

    session.cart.add_item(&product, quantity);
    Ok(())
}

/// Remove a product from the cart.
pub fn remove(session: &mut Session, product_id: &ProductId) {
    session.cart.remove_item(product_id);
}

/// Set a line's quantity.
pub fn update(session: &mut Session, product_id: &ProductId, quantity: i64) {
    session.cart.update_quantity(product_id, quantity);
}

/// Empty the cart.
pub fn clear(session: &mut Session) {
    session.cart.clear_cart();
}
