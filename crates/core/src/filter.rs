//! Catalog search.
//!
//! Matching runs in two tiers. If any title equals the query (ignoring case
//! and surrounding whitespace) only those entries stay visible and the first
//! one becomes the scroll target. Otherwise every entry whose title and price
//! label contain the query stays visible.

use crate::catalog::{Catalog, CatalogEntry};
use crate::types::CatalogEntryId;

/// Which tier produced a [`FilterOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Blank query; nothing is filtered.
    All,
    /// One or more titles matched the query exactly.
    Exact,
    /// Substring match over title and price.
    Substring,
}

/// Visible entries for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub tier: MatchTier,
    /// Visible entry ids, in catalog order.
    pub visible: Vec<CatalogEntryId>,
    /// Entry the page should scroll into view.
    pub scroll_target: Option<CatalogEntryId>,
}

impl FilterOutcome {
    #[must_use]
    pub fn is_visible(&self, id: CatalogEntryId) -> bool {
        self.visible.contains(&id)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

/// Stateless catalog filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFilter;

impl CatalogFilter {
    /// Compute which catalog entries are visible for `query`.
    #[must_use]
    pub fn filter(query: &str, catalog: &Catalog) -> FilterOutcome {
        let query = normalize(query);
        let entries = catalog.entries();

        if query.is_empty() {
            return FilterOutcome {
                tier: MatchTier::All,
                visible: entries.iter().map(CatalogEntry::id).collect(),
                scroll_target: None,
            };
        }

        let exact: Vec<CatalogEntryId> = entries
            .iter()
            .filter(|entry| normalize(entry.title()) == query)
            .map(CatalogEntry::id)
            .collect();

        if let Some(&first) = exact.first() {
            return FilterOutcome {
                tier: MatchTier::Exact,
                visible: exact,
                scroll_target: Some(first),
            };
        }

        let visible = entries
            .iter()
            .filter(|entry| haystack(entry).contains(&query))
            .map(CatalogEntry::id)
            .collect();

        FilterOutcome {
            tier: MatchTier::Substring,
            visible,
            scroll_target: None,
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn haystack(entry: &CatalogEntry) -> String {
    format!("{} {}", entry.title(), entry.price()).to_lowercase()
}
