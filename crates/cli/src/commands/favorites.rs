//! Favorites commands.

use std::io::Write;

use shelfcart_core::ProductId;

use super::{CommandError, Session};

/// Add or remove a favorite.
pub fn toggle(session: &mut Session, product_id: &ProductId) {
    session.favorites.toggle_favorite(product_id);
}

/// Print favorites, with titles for products the catalog knows.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn list(session: &Session, out: &mut impl Write) -> Result<(), CommandError> {
    if session.favorites.is_empty() {
        writeln!(out, "No favorites")?;
        return Ok(());
    }

    for id in session.favorites.ids() {
        match session.catalog.product(&id) {
            Some(product) => writeln!(out, "{id}\t{}", product.title())?,
            None => writeln!(out, "{id}")?,
        }
    }
    Ok(())
}

/// Remove every favorite.
pub fn clear(session: &mut Session) {
    session.favorites.clear_favorites();
}
