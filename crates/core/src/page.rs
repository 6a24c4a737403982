//! One page session: the cart, the panel, and the actions a shopper can take.
//!
//! Every [`Action`] runs exactly one operation on one component and reports
//! what needs re-rendering as an [`Effect`]. Nothing here blocks or fails.

use serde::{Deserialize, Serialize};

use crate::cart::CartStore;
use crate::catalog::{Catalog, InitialCartRow};
use crate::filter::{CatalogFilter, FilterOutcome};
use crate::panel::{CartPanel, PanelTrigger};
use crate::types::LineItemId;

/// A user action on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddToCart { name: String },
    Increment { line: LineItemId },
    Decrement { line: LineItemId },
    Remove { line: LineItemId },
    OpenCartPanel,
    CloseCartPanel,
    EscapePressed,
    Search { query: String },
    ClearSearch,
}

/// What changed after an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The cart panel (rows, count, empty message, open state) must be re-rendered.
    Cart,
    /// The catalog grid must be re-rendered with this visibility.
    Catalog(FilterOutcome),
}

/// State of a single page load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub cart: CartStore,
    pub panel: CartPanel,
}

impl PageState {
    /// A fresh page with an empty cart and a closed panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh page whose cart already holds `rows`.
    ///
    /// Rows go through the normal add path, so duplicates merge and a
    /// quantity of zero still yields one unit. The panel starts closed.
    #[must_use]
    pub fn seeded(catalog: &Catalog, rows: &[InitialCartRow]) -> Self {
        let mut page = Self::new();
        for row in rows {
            let (price, image) = catalog.listing_for(&row.name);
            let line = page.cart.add_item(&row.name, price, image).line;
            page.cart.add_units(line, row.quantity.saturating_sub(1));
        }
        page
    }

    /// Apply an action.
    pub fn dispatch(&mut self, action: Action, catalog: &Catalog) -> Effect {
        match action {
            Action::AddToCart { name } => {
                let (price, image) = catalog.listing_for(&name);
                self.cart.add_item(&name, price, image);
                self.panel = self.panel.on(PanelTrigger::AddToCart);
                Effect::Cart
            }
            Action::Increment { line } => {
                self.cart.increment_quantity(line);
                Effect::Cart
            }
            Action::Decrement { line } => {
                self.cart.decrement_quantity(line);
                Effect::Cart
            }
            Action::Remove { line } => {
                self.cart.remove_item(line);
                Effect::Cart
            }
            Action::OpenCartPanel => {
                self.panel = self.panel.on(PanelTrigger::CartIcon);
                Effect::Cart
            }
            Action::CloseCartPanel => {
                self.panel = self.panel.on(PanelTrigger::CloseButton);
                Effect::Cart
            }
            Action::EscapePressed => {
                self.panel = self.panel.on(PanelTrigger::EscapeKey);
                Effect::Cart
            }
            Action::Search { query } => Effect::Catalog(CatalogFilter::filter(&query, catalog)),
            Action::ClearSearch => Effect::Catalog(CatalogFilter::filter("", catalog)),
        }
    }
}
