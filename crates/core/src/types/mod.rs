//! Core value types for Bazaar.
//!
//! This module provides type-safe wrappers for identifiers and display labels.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{PLACEHOLDER_PRICE, PriceLabel};
