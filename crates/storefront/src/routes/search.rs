//! Search route handlers.
//!
//! Filtering never hides the grid wholesale: the full catalog is re-rendered
//! with non-matching cards marked `hide`, so the add-to-cart forms keep
//! working for whatever is visible.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use bazaar_core::{Action, CatalogFilter, Effect, FilterOutcome};
use serde::Deserialize;
use tracing::instrument;

use crate::pages::PageId;
use crate::state::AppState;
use crate::views::{CatalogView, catalog_entry_dom_id};

/// HTMX response header overriding the swap of the triggering element.
const HX_RESWAP: &str = "HX-Reswap";

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Page session the grid belongs to.
    #[serde(default)]
    pub page: Option<String>,
}

/// Clear search query parameters.
#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    #[serde(default)]
    pub page: Option<String>,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog.html")]
pub struct CatalogTemplate {
    pub catalog: CatalogView,
}

/// Product grid plus an out-of-band empty search box (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_cleared.html")]
pub struct SearchClearedTemplate {
    pub catalog: CatalogView,
    pub query: String,
    pub oob: bool,
}

/// Run a search action, through the page session when it is still live.
async fn run(state: &AppState, page: Option<PageId>, action: Action) -> FilterOutcome {
    if let Some(id) = page
        && let Some((Effect::Catalog(outcome), _)) =
            state.pages().dispatch(id, action.clone(), state.catalog()).await
    {
        return outcome;
    }

    match action {
        Action::Search { query } => CatalogFilter::filter(&query, state.catalog()),
        _ => CatalogFilter::filter("", state.catalog()),
    }
}

fn parse_page(raw: Option<&str>) -> Option<PageId> {
    raw.and_then(|raw| raw.parse().ok())
}

/// Filter the product grid (HTMX).
///
/// An exact title match scrolls that card into view.
#[instrument(skip(state))]
pub async fn search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let page = parse_page(query.page.as_deref());
    let outcome = run(&state, page, Action::Search { query: query.q }).await;

    tracing::debug!(
        tier = ?outcome.tier,
        visible = outcome.visible_count(),
        "Catalog filtered"
    );

    let scroll = outcome.scroll_target.map(|id| {
        format!(
            "outerHTML show:#{}:top",
            catalog_entry_dom_id(id.as_u32())
        )
    });

    let mut response = CatalogTemplate {
        catalog: CatalogView::new(page, state.catalog(), &outcome),
    }
    .into_response();

    if let Some(value) = scroll.and_then(|value| HeaderValue::from_str(&value).ok()) {
        response.headers_mut().insert(HX_RESWAP, value);
    }

    response
}

/// Show every product again and empty the search box (HTMX).
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> SearchClearedTemplate {
    let page = parse_page(query.page.as_deref());
    let outcome = run(&state, page, Action::ClearSearch).await;

    SearchClearedTemplate {
        catalog: CatalogView::new(page, state.catalog(), &outcome),
        query: String::new(),
        oob: true,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{app, get, page_id, send, state};

    #[tokio::test]
    async fn test_exact_match_shows_only_that_product_and_scrolls() {
        let state = state();
        let (response, body) = send(app(&state), get("/search?q=%20cap%20")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body.contains(r#"<div class="item hide" id="catalog-entry-0">"#));
        assert!(body.contains(r#"<div class="item" id="catalog-entry-1">"#));
        assert!(body.contains(r#"<div class="item hide" id="catalog-entry-2">"#));
        assert_eq!(
            response.headers().get("hx-reswap").and_then(|v| v.to_str().ok()),
            Some("outerHTML show:#catalog-entry-1:top")
        );
    }

    #[tokio::test]
    async fn test_substring_match_over_title_and_price() {
        let state = state();
        let (response, body) = send(app(&state), get("/search?q=caps")).await;

        assert!(body.contains(r#"<div class="item hide" id="catalog-entry-1">"#));
        assert!(body.contains(r#"<div class="item" id="catalog-entry-2">"#));
        assert!(response.headers().get("hx-reswap").is_none());

        // Price text is searchable too
        let (_, body) = send(app(&state), get("/search?q=pkr%20500")).await;
        assert!(body.contains(r#"<div class="item" id="catalog-entry-0">"#));
        assert!(body.contains(r#"data-visible="1""#));
    }

    #[tokio::test]
    async fn test_no_match_hides_everything() {
        let state = state();
        let (_, body) = send(app(&state), get("/search?q=zzz")).await;
        assert!(body.contains(r#"data-visible="0""#));
        assert!(!body.contains(r#"<div class="item" "#));
    }

    #[tokio::test]
    async fn test_blank_query_shows_all() {
        let state = state();
        let (_, body) = send(app(&state), get("/search?q=%20%20")).await;
        assert!(body.contains(r#"data-visible="3""#));
    }

    #[tokio::test]
    async fn test_search_keeps_page_id_in_forms() {
        let state = state();
        let (_, page) = send(app(&state), get("/")).await;
        let page = page_id(&page);

        let (_, body) = send(app(&state), get(&format!("/search?q=mug&page={page}"))).await;
        assert_eq!(page_id(&body), page);
    }

    #[tokio::test]
    async fn test_clear_resets_grid_and_input() {
        let state = state();
        let (_, body) = send(app(&state), get("/search/clear")).await;

        assert!(body.contains(r#"data-visible="3""#));
        assert!(body.contains(r#"id="search-input""#));
        assert!(body.contains(r#"value="""#));
        assert!(body.contains(r#"hx-swap-oob="true""#));
    }
}
