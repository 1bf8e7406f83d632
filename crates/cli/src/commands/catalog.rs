//! Catalog commands.

use std::io::Write;

use shelfcart_core::{CategoryId, Price, Product};

use super::{CommandError, Session};

/// Print catalog products with stock, cart quantity, and favorite marker.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn list(
    session: &Session,
    category: Option<&CategoryId>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let products: Vec<&Product> = match category {
        Some(category) => session.catalog.in_category(category).collect(),
        None => session.catalog.products().iter().collect(),
    };

    if products.is_empty() {
        writeln!(out, "No products")?;
        return Ok(());
    }

    for product in products {
        let stock = product
            .stock()
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
        let favorite = if session.favorites.is_favorite(product.id()) {
            " ★"
        } else {
            ""
        };
        writeln!(
            out,
            "{}\t{}\t{}\tstock: {stock}\tin cart: {}{favorite}",
            product.id(),
            product.title(),
            Price::new(product.price(), session.config.currency),
            session.cart.get_item_quantity(product.id()),
        )?;
    }
    Ok(())
}
