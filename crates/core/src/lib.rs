//! Bazaar Core - storefront page domain logic.
//!
//! This crate holds everything a storefront page session does, independent of
//! how the page is rendered or served:
//! - [`cart`] - The cart line items and their quantity rules
//! - [`catalog`] - The read-only product listing
//! - [`filter`] - Two-tier catalog search
//! - [`panel`] - The cart panel open/closed state machine
//! - [`page`] - One page session tying the above together behind user actions
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no clock. The storefront crate owns loading, session storage, and rendering.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod filter;
pub mod page;
pub mod panel;
pub mod types;

pub use cart::{AddOutcome, CartLineItem, CartStore, FALLBACK_ITEM_NAME};
pub use catalog::{Catalog, CatalogEntry, CatalogError, CatalogFile, InitialCartRow, Listing};
pub use filter::{CatalogFilter, FilterOutcome, MatchTier};
pub use page::{Action, Effect, PageState};
pub use panel::{CartPanel, PanelTrigger};
pub use types::*;
