//! Stock-aware shopping cart.
//!
//! [`CartState`] is the reducer: it applies a [`CartAction`] against a known
//! stock ceiling and reports a [`CartOutcome`]. [`CartStore`] resolves the
//! ceiling, persists, and dispatches notifications around it.

mod state;
mod store;

pub use state::{CartAction, CartLine, CartOutcome, CartSnapshot, CartState};
pub use store::{CART_FORMAT_VERSION, CART_KEY, CartStore};
