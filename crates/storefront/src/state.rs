//! Application state shared across handlers.

use std::sync::Arc;

use bazaar_core::{Catalog, PageState};

use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::pages::{PageId, PageRegistry};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the live page sessions, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    pages: PageRegistry,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: CatalogStore) -> Self {
        let pages = PageRegistry::new(&config.pages);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                pages,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.inner.catalog.catalog()
    }

    /// Get a reference to the page session registry.
    #[must_use]
    pub fn pages(&self) -> &PageRegistry {
        &self.inner.pages
    }

    /// Open a fresh page session seeded with the configured initial cart.
    pub async fn open_page(&self) -> (PageId, PageState) {
        let state = PageState::seeded(self.catalog(), self.inner.catalog.initial_cart());
        let id = self.pages().open(state.clone()).await;
        (id, state)
    }
}
