//! Shelfcart Store - Client-session cart and favorites state.
//!
//! This crate holds the state a shopper accumulates while browsing: a
//! stock-aware cart and a set of favorited products. Both are synchronous
//! reducers over local state, persisted to a scoped key-value store after
//! every mutation and rehydrated on load.
//!
//! # Architecture
//!
//! - [`cart::CartState`] and [`favorites::FavoriteSet`] are pure reducers:
//!   state + action in, new state + outcome tag out.
//! - [`cart::CartStore`] and [`favorites::FavoritesStore`] wrap the reducers
//!   with stock lookup, persistence, and notification dispatch.
//! - Stores are plain values owned by the caller; there are no globals.
//!
//! Nothing here returns an error for a cart or favorites mutation. Stock
//! limits, unknown products, and storage failures degrade to clamps or
//! no-ops and are reported through [`notify::Notification`]s.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod notify;
pub mod storage;

pub use cart::{CartAction, CartLine, CartOutcome, CartSnapshot, CartState, CartStore};
pub use catalog::{Catalog, CatalogError, StockLookup, Unlimited};
pub use config::{ConfigError, StoreConfig};
pub use favorites::{FavoriteOutcome, FavoriteSet, FavoritesStore};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, Namespace, StorageError};
