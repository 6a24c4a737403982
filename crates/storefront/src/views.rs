//! Display data for templates.
//!
//! Views are built from core state in one pass and handed to askama; the
//! templates never look anything up on their own.

use bazaar_core::{Catalog, CartLineItem, CatalogEntry, FilterOutcome, PageState};

use crate::pages::PageId;

/// One cart row.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    pub quantity: u32,
}

impl From<&CartLineItem> for CartLineView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            id: line.id().as_u32(),
            name: line.name().to_string(),
            price: line.price().to_string(),
            image: non_empty(line.image_ref()),
            quantity: line.quantity(),
        }
    }
}

/// The cart panel and count badge.
#[derive(Debug, Clone)]
pub struct CartView {
    pub page: String,
    pub lines: Vec<CartLineView>,
    pub total: u64,
    pub is_empty: bool,
    pub is_open: bool,
}

impl CartView {
    #[must_use]
    pub fn new(page: PageId, state: &PageState) -> Self {
        Self {
            page: page.to_string(),
            lines: state.cart.lines().iter().map(CartLineView::from).collect(),
            total: state.cart.total(),
            is_empty: state.cart.shows_empty_indicator(),
            is_open: state.panel.is_open(),
        }
    }
}

/// One product card.
#[derive(Debug, Clone)]
pub struct CatalogEntryView {
    pub id: u32,
    pub title: String,
    pub price: String,
    pub image: Option<String>,
    pub hidden: bool,
}

impl CatalogEntryView {
    fn new(entry: &CatalogEntry, outcome: &FilterOutcome) -> Self {
        Self {
            id: entry.id().as_u32(),
            title: entry.title().to_string(),
            price: entry.price().to_string(),
            image: non_empty(entry.image_ref()),
            hidden: !outcome.is_visible(entry.id()),
        }
    }
}

/// The product grid.
#[derive(Debug, Clone)]
pub struct CatalogView {
    /// Page id for the add-to-cart forms; empty when rendered without a page.
    pub page: String,
    pub entries: Vec<CatalogEntryView>,
    pub visible_count: usize,
}

impl CatalogView {
    #[must_use]
    pub fn new(page: Option<PageId>, catalog: &Catalog, outcome: &FilterOutcome) -> Self {
        Self {
            page: page.map(|id| id.to_string()).unwrap_or_default(),
            entries: catalog
                .entries()
                .iter()
                .map(|entry| CatalogEntryView::new(entry, outcome))
                .collect(),
            visible_count: outcome.visible_count(),
        }
    }
}

/// DOM id of a product card.
#[must_use]
pub fn catalog_entry_dom_id(id: u32) -> String {
    format!("catalog-entry-{id}")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
