//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page (opens a page session)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments, form posts redirect back to the page)
//! POST /cart/add               - Add a product by name
//! POST /cart/increment         - Quantity + 1
//! POST /cart/decrement         - Quantity - 1, never below 1
//! POST /cart/remove            - Remove a row
//! POST /cart/open              - Open the cart panel
//! POST /cart/close             - Close the cart panel
//! POST /cart/escape            - Escape pressed
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Search (HTMX fragments)
//! GET  /search                 - Filter the catalog grid
//! GET  /search/clear           - Show every product and clear the search box
//! ```

pub mod cart;
pub mod home;
pub mod search;

use axum::{
    Router,
    extract::Request,
    http::HeaderMap,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{SecurityHeaders, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Header HTMX sets on every request it issues.
const HX_REQUEST: &str = "hx-request";

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/escape", post(cart::escape))
        .route("/count", get(cart::count))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/clear", get(search::clear))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .nest("/search", search_routes())
}

/// Build the full application: routes, static files, and middleware.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().static_dir);
    let security_headers = SecurityHeaders::for_htmx_src(&state.config().htmx_src);

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", static_files)
        .layer(from_fn_with_state(
            security_headers,
            security_headers_middleware,
        ))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Whether the request was issued by HTMX rather than a plain form post.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes() == b"true")
}
