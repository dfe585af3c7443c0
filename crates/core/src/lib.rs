//! Verto Core - Shared types library.
//!
//! This crate provides common types used across all Verto components:
//! - `cart` - Client-side cart state, persistence and the catalog client
//! - `catalog-service` - HTTP backend serving products and accepting orders
//! - `cli` - Terminal front-end over the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! Both sides of the wire depend on it so the JSON shapes cannot drift apart.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, cart lines
//! - [`api`] - Request and response envelopes for the catalog HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use types::*;
