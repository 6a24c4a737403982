//! Price labels as shown on the page.
//!
//! Prices are display strings such as `"PKR 500"`. They are copied from the
//! catalog listing into cart rows verbatim and never parsed into amounts, so
//! there is no currency or rounding logic anywhere in the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label shown for products whose price could not be found.
pub const PLACEHOLDER_PRICE: &str = "PKR —";

/// An opaque price display string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceLabel(String);

impl PriceLabel {
    /// Create a label, trimming surrounding whitespace.
    #[must_use]
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_string())
    }

    /// The label used when a product has no known price.
    #[must_use]
    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_PRICE.to_string())
    }

    /// Get the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the placeholder label.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_PRICE
    }
}

impl Default for PriceLabel {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl fmt::Display for PriceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PriceLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}
