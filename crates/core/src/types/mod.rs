//! Core types for Verto.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_line;
pub mod id;
pub mod price;
pub mod product;

pub use cart_line::{CartLine, CartLinesError, validate_lines};
pub use id::*;
pub use price::Price;
pub use product::Product;
