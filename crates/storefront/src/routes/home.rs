//! Storefront page handler.
//!
//! A plain `GET /` always opens a fresh page session, which is what makes a
//! browser reload reset the cart. Form posts from browsers without HTMX
//! redirect back here with `?page=<id>` to resume their session.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use bazaar_core::CatalogFilter;
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::pages::PageId;
use crate::state::AppState;
use crate::views::{CartView, CatalogView};

/// Page query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Page session to resume.
    #[serde(default)]
    pub page: Option<String>,
    /// Search text to pre-filter the catalog with.
    #[serde(default)]
    pub q: String,
}

/// Full storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub cart: CartView,
    pub catalog: CatalogView,
    pub query: String,
    pub oob: bool,
    pub htmx_src: String,
}

/// Render the storefront page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> HomeTemplate {
    let resumed = match query.page.as_deref().and_then(|raw| raw.parse::<PageId>().ok()) {
        Some(id) => state.pages().snapshot(id).await.map(|page| (id, page)),
        None => None,
    };

    let (id, page) = match resumed {
        Some(resumed) => resumed,
        None => state.open_page().await,
    };

    let outcome = CatalogFilter::filter(&query.q, state.catalog());

    HomeTemplate {
        cart: CartView::new(id, &page),
        catalog: CatalogView::new(Some(id), state.catalog(), &outcome),
        query: query.q,
        oob: false,
        htmx_src: state.config().htmx_src.clone(),
    }
}
