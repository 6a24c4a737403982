//! Bazaar storefront library.
//!
//! The server-rendered shop front: one product grid, a search box, and a
//! slide-in cart panel driven by HTMX. Cart and panel state live in
//! per-page sessions held in memory; see [`pages`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod pages;
pub mod routes;
pub mod state;
pub mod views;
