//! In-memory page sessions.
//!
//! Every full page load opens a new session with a random [`PageId`]; the id
//! is embedded in the rendered page and sent back with each HTMX action.
//! Sessions live only in this process and are dropped after a period of
//! inactivity (`moka` time-to-idle), so a reload always starts fresh.
//!
//! Each session sits behind its own `tokio::sync::Mutex`. Actions for one
//! page therefore run strictly one after another, while different pages
//! never contend.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bazaar_core::{Action, Catalog, Effect, PageState};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::config::PageSessionConfig;

/// Identifier of one page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    /// Generate a new random page id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

type SharedPage = Arc<Mutex<PageState>>;

/// Registry of live page sessions.
#[derive(Clone)]
pub struct PageRegistry {
    cache: Cache<PageId, SharedPage>,
}

impl PageRegistry {
    #[must_use]
    pub fn new(config: &PageSessionConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_pages)
            .time_to_idle(config.idle_timeout)
            .build();
        Self { cache }
    }

    /// Register a new page session and return its id.
    pub async fn open(&self, state: PageState) -> PageId {
        let id = PageId::generate();
        self.cache.insert(id, Arc::new(Mutex::new(state))).await;
        debug!(page_id = %id, "Opened page session");
        id
    }

    /// Current state of a page, if it is still live.
    pub async fn snapshot(&self, id: PageId) -> Option<PageState> {
        let page = self.cache.get(&id).await?;
        let state = page.lock().await;
        Some(state.clone())
    }

    /// Apply an action to a page.
    ///
    /// Returns the effect and the page state right after the action, or
    /// `None` if the page is unknown or has expired.
    pub async fn dispatch(
        &self,
        id: PageId,
        action: Action,
        catalog: &Catalog,
    ) -> Option<(Effect, PageState)> {
        let page = self.cache.get(&id).await?;
        let mut state = page.lock().await;
        let effect = state.dispatch(action, catalog);
        Some((effect, state.clone()))
    }

    /// Number of live sessions (approximate until pending tasks run).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
