//! Shelfcart Core - Shared domain types.
//!
//! This crate provides the types shared by all Shelfcart components:
//! - `store` - Cart and favorites state, persistence, and catalog lookup
//! - `cli` - Command-line front end driving the stores
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no logging. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, and product records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
