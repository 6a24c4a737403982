//! Cart line items and the operations that mutate them.
//!
//! The cart is keyed by product name: adding a name that is already in the
//! cart bumps its quantity instead of creating a second row. Each row also
//! gets a [`LineItemId`] at creation so the page can address it without
//! re-reading names out of rendered markup.
//!
//! Quantities never drop below 1. The only way to get rid of a row is
//! [`CartStore::remove_item`].

use serde::{Deserialize, Serialize};

use crate::types::{LineItemId, PriceLabel};

/// Name used when an item is added with a blank name.
pub const FALLBACK_ITEM_NAME: &str = "Item";

/// One row in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    id: LineItemId,
    name: String,
    image_ref: String,
    price: PriceLabel,
    quantity: u32,
}

impl CartLineItem {
    #[must_use]
    pub const fn id(&self) -> LineItemId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub const fn price(&self) -> &PriceLabel {
        &self.price
    }

    /// Current quantity, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Result of [`CartStore::add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// The row that was created or bumped.
    pub line: LineItemId,
    /// Quantity of that row after the add.
    pub quantity: u32,
    /// `true` if the add created a new row.
    pub created: bool,
}

/// The cart of one page session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartStore {
    lines: Vec<CartLineItem>,
    next_id: u32,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `name` to the cart.
    ///
    /// If a row with the same (trimmed) name exists its quantity is bumped and
    /// the supplied price and image are ignored. Otherwise a new row with
    /// quantity 1 is created from them. A blank name is stored as
    /// [`FALLBACK_ITEM_NAME`].
    pub fn add_item(
        &mut self,
        name: &str,
        price: PriceLabel,
        image_ref: impl Into<String>,
    ) -> AddOutcome {
        let name = normalize_name(name);

        if let Some(line) = self.lines.iter_mut().find(|line| line.name == name) {
            line.quantity = line.quantity.saturating_add(1);
            return AddOutcome {
                line: line.id,
                quantity: line.quantity,
                created: false,
            };
        }

        let id = LineItemId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.lines.push(CartLineItem {
            id,
            name,
            image_ref: image_ref.into(),
            price,
            quantity: 1,
        });

        AddOutcome {
            line: id,
            quantity: 1,
            created: true,
        }
    }

    /// Bump a row's quantity by one.
    ///
    /// Returns the new quantity, or `None` if the row does not exist.
    pub fn increment_quantity(&mut self, id: LineItemId) -> Option<u32> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_add(1);
        Some(line.quantity)
    }

    /// Bump a row's quantity by `extra` in one step.
    pub(crate) fn add_units(&mut self, id: LineItemId, extra: u32) -> Option<u32> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_add(extra);
        Some(line.quantity)
    }

    /// Lower a row's quantity by one, stopping at 1.
    ///
    /// Returns the new quantity, or `None` if the row does not exist.
    pub fn decrement_quantity(&mut self, id: LineItemId) -> Option<u32> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_sub(1).max(1);
        Some(line.quantity)
    }

    /// Delete a row. Returns the removed row, if there was one.
    pub fn remove_item(&mut self, id: LineItemId) -> Option<CartLineItem> {
        let index = self.lines.iter().position(|line| line.id == id)?;
        Some(self.lines.remove(index))
    }

    /// Sum of all quantities. Zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Whether the "your cart is empty" message should be shown.
    #[must_use]
    pub fn shows_empty_indicator(&self) -> bool {
        self.total() == 0
    }

    /// Look up the row for a product name.
    #[must_use]
    pub fn line_id(&self, name: &str) -> Option<LineItemId> {
        let name = normalize_name(name);
        self.lines
            .iter()
            .find(|line| line.name == name)
            .map(CartLineItem::id)
    }

    #[must_use]
    pub fn get(&self, id: LineItemId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Rows in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: LineItemId) -> Option<&mut CartLineItem> {
        self.lines.iter_mut().find(|line| line.id == id)
    }
}

fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        FALLBACK_ITEM_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mug(cart: &mut CartStore) -> AddOutcome {
        cart.add_item("Mug", PriceLabel::new("PKR 500"), "mug.png")
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = CartStore::new();
        assert_eq!(cart.total(), 0);
        assert!(cart.shows_empty_indicator());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_same_name_bumps_quantity() {
        let mut cart = CartStore::new();
        let first = mug(&mut cart);
        let second = mug(&mut cart);

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.line, second.line);
        assert_eq!(second.quantity, 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), 2);
    }

    #[test]
    fn test_repeated_adds_match_call_count() {
        let mut cart = CartStore::new();
        for _ in 0..5 {
            cart.add_item("Cap", PriceLabel::new("PKR 900"), "cap.png");
        }
        let [line] = cart.lines() else {
            panic!("expected exactly one line");
        };
        assert_eq!(line.quantity(), 5);
        assert_eq!(cart.total(), 5);
    }

    #[test]
    fn test_repeat_add_keeps_original_price_and_image() {
        let mut cart = CartStore::new();
        let line = mug(&mut cart).line;
        cart.add_item("Mug", PriceLabel::new("PKR 1"), "other.png");

        let item = cart.get(line).unwrap();
        assert_eq!(item.price().as_str(), "PKR 500");
        assert_eq!(item.image_ref(), "mug.png");
    }

    #[test]
    fn test_add_trims_name() {
        let mut cart = CartStore::new();
        let a = cart.add_item("  Mug ", PriceLabel::placeholder(), "");
        let b = mug(&mut cart);
        assert_eq!(a.line, b.line);
        assert_eq!(cart.get(a.line).unwrap().name(), "Mug");
    }

    #[test]
    fn test_blank_name_falls_back() {
        let mut cart = CartStore::new();
        let outcome = cart.add_item("   ", PriceLabel::placeholder(), "");
        assert_eq!(cart.get(outcome.line).unwrap().name(), FALLBACK_ITEM_NAME);
        assert_eq!(cart.line_id(""), Some(outcome.line));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut cart = CartStore::new();
        mug(&mut cart);
        cart.add_item("mug", PriceLabel::placeholder(), "");
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut cart = CartStore::new();
        let line = mug(&mut cart).line;

        assert_eq!(cart.decrement_quantity(line), Some(1));
        assert_eq!(cart.decrement_quantity(line), Some(1));
        assert_eq!(cart.get(line).unwrap().quantity(), 1);
        assert_eq!(cart.total(), 1);
    }

    #[test]
    fn test_increment_then_decrement() {
        let mut cart = CartStore::new();
        let line = mug(&mut cart).line;

        assert_eq!(cart.increment_quantity(line), Some(2));
        assert_eq!(cart.increment_quantity(line), Some(3));
        assert_eq!(cart.decrement_quantity(line), Some(2));
        assert_eq!(cart.total(), 2);
    }

    #[test]
    fn test_unknown_line_is_noop() {
        let mut cart = CartStore::new();
        mug(&mut cart);
        let before = cart.clone();
        let missing = LineItemId::new(99);

        assert_eq!(cart.increment_quantity(missing), None);
        assert_eq!(cart.decrement_quantity(missing), None);
        assert!(cart.remove_item(missing).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_last_item_shows_empty_indicator() {
        let mut cart = CartStore::new();
        let line = mug(&mut cart).line;
        cart.increment_quantity(line);

        let removed = cart.remove_item(line).unwrap();
        assert_eq!(removed.name(), "Mug");
        assert_eq!(cart.total(), 0);
        assert!(cart.shows_empty_indicator());
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut cart = CartStore::new();
        let first = mug(&mut cart).line;
        cart.remove_item(first);
        let second = mug(&mut cart).line;
        assert_ne!(first, second);
    }

    #[test]
    fn test_total_sums_all_lines() {
        let mut cart = CartStore::new();
        let mug_line = mug(&mut cart).line;
        cart.add_item("Cap", PriceLabel::new("PKR 900"), "cap.png");
        cart.increment_quantity(mug_line);
        cart.increment_quantity(mug_line);

        let expected: u64 = cart.lines().iter().map(|l| u64::from(l.quantity())).sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), 4);
        assert!(!cart.shows_empty_indicator());
    }

    #[test]
    fn test_add_units_saturates() {
        let mut cart = CartStore::new();
        let line = cart.add_item("Mug", PriceLabel::new("PKR 500"), "").line;

        assert_eq!(cart.add_units(line, 4), Some(5));
        assert_eq!(cart.add_units(line, u32::MAX), Some(u32::MAX));
        assert_eq!(cart.add_units(LineItemId::new(99), 1), None);
    }
}
