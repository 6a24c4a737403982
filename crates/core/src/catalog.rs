//! The product listing shown on the page.
//!
//! The catalog is supplied from outside (a JSON file for the storefront) and
//! is never mutated after it is built. Entries get positional
//! [`CatalogEntryId`]s in listing order.
//!
//! # File Format
//!
//! ```json
//! {
//!   "products": [
//!     { "title": "Mug", "price": "PKR 500", "image": "/static/images/mug.png" }
//!   ],
//!   "initial_cart": [
//!     { "name": "Mug", "quantity": 1 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CatalogEntryId, PriceLabel};

/// Errors reading a catalog listing.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The listing is not valid JSON or does not match the expected shape.
    #[error("invalid catalog listing: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product has a blank title.
    #[error("product #{0} has an empty title")]
    EmptyTitle(usize),
}

/// One product as it appears in the listing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    #[serde(default)]
    pub price: PriceLabel,
    #[serde(default)]
    pub image: String,
}

/// A cart row every fresh page session starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialCartRow {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// The full listing file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub products: Vec<Listing>,
    #[serde(default)]
    pub initial_cart: Vec<InitialCartRow>,
}

impl CatalogFile {
    /// Parse a listing file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON and
    /// `CatalogError::EmptyTitle` if any product title is blank.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: Self = serde_json::from_str(json)?;
        if let Some(index) = file.products.iter().position(|p| p.title.trim().is_empty()) {
            return Err(CatalogError::EmptyTitle(index));
        }
        Ok(file)
    }
}

/// One product on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    id: CatalogEntryId,
    title: String,
    price: PriceLabel,
    image_ref: String,
}

impl CatalogEntry {
    #[must_use]
    pub const fn id(&self) -> CatalogEntryId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn price(&self) -> &PriceLabel {
        &self.price
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }
}

/// The read-only product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from listings, numbering entries in order.
    #[must_use]
    pub fn from_listings(listings: impl IntoIterator<Item = Listing>) -> Self {
        let entries = listings
            .into_iter()
            .zip(0u32..)
            .map(|(listing, index)| CatalogEntry {
                id: CatalogEntryId::new(index),
                title: listing.title.trim().to_string(),
                price: listing.price,
                image_ref: listing.image.trim().to_string(),
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: CatalogEntryId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first product whose title equals `name` after trimming.
    ///
    /// This lookup is case-sensitive; only search is case-insensitive.
    #[must_use]
    pub fn find_by_title(&self, name: &str) -> Option<&CatalogEntry> {
        let name = name.trim();
        self.entries.iter().find(|entry| entry.title == name)
    }

    /// Price and image to use when `name` is added to the cart.
    ///
    /// Unknown products get the placeholder price and no image.
    #[must_use]
    pub fn listing_for(&self, name: &str) -> (PriceLabel, String) {
        self.find_by_title(name).map_or_else(
            || (PriceLabel::placeholder(), String::new()),
            |entry| (entry.price.clone(), entry.image_ref.clone()),
        )
    }
}
