//! Cart route handlers.
//!
//! Every handler runs one action against the page session named in the form
//! and answers HTMX with the re-rendered cart panel plus an out-of-band count
//! badge. Plain form posts get redirected back to the page instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::{Action, LineItemId};
use serde::Deserialize;
use tracing::instrument;

use super::is_htmx;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::pages::PageId;
use crate::state::AppState;
use crate::views::CartView;

/// Longest product name accepted from a form.
const MAX_NAME_LEN: usize = 200;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub page: PageId,
    pub name: String,
}

/// Form data for actions on one cart row.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub page: PageId,
    pub line: LineItemId,
}

/// Form data for panel actions.
#[derive(Debug, Deserialize)]
pub struct PanelForm {
    pub page: PageId,
}

/// Cart count query parameters.
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub page: PageId,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
    /// Also emit the count badge as an out-of-band swap.
    pub oob: bool,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart: CartView,
    pub oob: bool,
}

/// Run `action` on `page` and build the response.
async fn apply(
    state: &AppState,
    headers: &HeaderMap,
    page: PageId,
    action: Action,
) -> Result<Response> {
    let htmx = is_htmx(headers);

    let Some((_, page_state)) = state.pages().dispatch(page, action, state.catalog()).await
    else {
        tracing::debug!(page_id = %page, "Action for unknown page");
        if htmx {
            return Err(AppError::PageExpired);
        }
        return Ok(Redirect::to("/").into_response());
    };

    if !htmx {
        return Ok(Redirect::to(&format!("/?page={page}")).into_response());
    }

    Ok(CartPanelTemplate {
        cart: CartView::new(page, &page_state),
        oob: true,
    }
    .into_response())
}

/// Add a product to the cart (HTMX).
///
/// Price and image come from the catalog; unknown names still get a row with
/// placeholder values. Opens the cart panel.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    if form.name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "product name longer than {MAX_NAME_LEN} characters"
        )));
    }

    add_breadcrumb("cart", "Added to cart", Some(&[("name", form.name.as_str())]));

    apply(
        &state,
        &headers,
        form.page,
        Action::AddToCart { name: form.name },
    )
    .await
}

/// Increase a row's quantity (HTMX).
#[instrument(skip(state, headers))]
pub async fn increment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LineForm>,
) -> Result<Response> {
    apply(
        &state,
        &headers,
        form.page,
        Action::Increment { line: form.line },
    )
    .await
}

/// Decrease a row's quantity, never below 1 (HTMX).
#[instrument(skip(state, headers))]
pub async fn decrement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LineForm>,
) -> Result<Response> {
    apply(
        &state,
        &headers,
        form.page,
        Action::Decrement { line: form.line },
    )
    .await
}

/// Remove a row (HTMX).
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LineForm>,
) -> Result<Response> {
    add_breadcrumb("cart", "Removed from cart", None);

    apply(
        &state,
        &headers,
        form.page,
        Action::Remove { line: form.line },
    )
    .await
}

/// Open the cart panel (HTMX).
#[instrument(skip(state, headers))]
pub async fn open(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PanelForm>,
) -> Result<Response> {
    apply(&state, &headers, form.page, Action::OpenCartPanel).await
}

/// Close the cart panel (HTMX).
#[instrument(skip(state, headers))]
pub async fn close(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PanelForm>,
) -> Result<Response> {
    apply(&state, &headers, form.page, Action::CloseCartPanel).await
}

/// Escape pressed on the page (HTMX).
#[instrument(skip(state, headers))]
pub async fn escape(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PanelForm>,
) -> Result<Response> {
    apply(&state, &headers, form.page, Action::EscapePressed).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Result<CartCountTemplate> {
    let page = state
        .pages()
        .snapshot(query.page)
        .await
        .ok_or(AppError::PageExpired)?;

    Ok(CartCountTemplate {
        cart: CartView::new(query.page, &page),
        oob: false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{StatusCode, header::LOCATION};
    use axum::{body::Body, http::Request};

    use super::super::test_support::{app, get, htmx_post, page_id, send, state};
    use crate::state::AppState;

    async fn open_page(state: &AppState) -> String {
        let (_, body) = send(app(state), get("/")).await;
        page_id(&body)
    }

    #[tokio::test]
    async fn test_add_opens_panel_and_updates_count() {
        let state = state();
        let page = open_page(&state).await;

        let (response, body) = send(
            app(&state),
            htmx_post("/cart/add", &format!("page={page}&name=Mug")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body.contains(r#"<aside id="carttab" class="open""#));
        assert!(body.contains("Mug <span class=\"name-price\">• PKR 500</span>"));
        assert!(body.contains(r#"alt="Mug">"#));
        // Initial Cap x2 plus one Mug
        assert!(body.contains(r#"<span id="cart-count" hx-swap-oob="true">3</span>"#));
    }

    #[tokio::test]
    async fn test_add_twice_merges_rows() {
        let state = state();
        let page = open_page(&state).await;

        for _ in 0..2 {
            send(
                app(&state),
                htmx_post("/cart/add", &format!("page={page}&name=Mug")),
            )
            .await;
        }

        let (_, body) = send(app(&state), get(&format!("/cart/count?page={page}"))).await;
        assert_eq!(body.trim(), r#"<span id="cart-count">4</span>"#);

        let (_, body) = send(app(&state), get(&format!("/?page={page}"))).await;
        assert_eq!(body.matches("<div class=\"name\"").count(), 2);
    }

    #[tokio::test]
    async fn test_add_unknown_product_uses_placeholder_price() {
        let state = state();
        let page = open_page(&state).await;

        let (_, body) = send(
            app(&state),
            htmx_post("/cart/add", &format!("page={page}&name=Kettle")),
        )
        .await;

        assert!(body.contains(r#"<div class="price">PKR —</div>"#));
    }

    #[tokio::test]
    async fn test_add_escapes_name() {
        let state = state();
        let page = open_page(&state).await;

        let (_, body) = send(
            app(&state),
            htmx_post(
                "/cart/add",
                &format!("page={page}&name=%3Cscript%3Ealert(1)%3C%2Fscript%3E"),
            ),
        )
        .await;

        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_decrement_floors_at_one_and_remove_empties_cart() {
        let state = state();
        let page = open_page(&state).await;
        // Initial row Cap x2 has line id 0
        let line = format!("page={page}&line=0");

        for _ in 0..3 {
            send(app(&state), htmx_post("/cart/decrement", &line)).await;
        }
        let (_, body) = send(app(&state), get(&format!("/cart/count?page={page}"))).await;
        assert_eq!(body.trim(), r#"<span id="cart-count">1</span>"#);

        let (_, body) = send(app(&state), htmx_post("/cart/remove", &line)).await;
        assert!(body.contains(r#"<span id="cart-count" hx-swap-oob="true">0</span>"#));
        assert!(body.contains(r#"<div id="cart-empty-message">Your cart is empty</div>"#));
    }

    #[tokio::test]
    async fn test_increment() {
        let state = state();
        let page = open_page(&state).await;

        let (_, body) = send(
            app(&state),
            htmx_post("/cart/increment", &format!("page={page}&line=0")),
        )
        .await;
        assert!(body.contains(r#"<span class="count">3</span>"#));
    }

    #[tokio::test]
    async fn test_unknown_line_is_noop() {
        let state = state();
        let page = open_page(&state).await;

        let (response, body) = send(
            app(&state),
            htmx_post("/cart/remove", &format!("page={page}&line=42")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body.contains(r#"hx-swap-oob="true">2</span>"#));
    }

    #[tokio::test]
    async fn test_panel_open_close_escape() {
        let state = state();
        let page = open_page(&state).await;
        let form = format!("page={page}");

        let (_, body) = send(app(&state), htmx_post("/cart/open", &form)).await;
        assert!(body.contains(r#"class="open""#));

        let (_, body) = send(app(&state), htmx_post("/cart/escape", &form)).await;
        assert!(body.contains(r#"<aside id="carttab" class="""#));

        // Escape while closed stays closed
        let (_, body) = send(app(&state), htmx_post("/cart/escape", &form)).await;
        assert!(body.contains(r#"<aside id="carttab" class="""#));

        send(app(&state), htmx_post("/cart/open", &form)).await;
        let (_, body) = send(app(&state), htmx_post("/cart/close", &form)).await;
        assert!(body.contains(r#"<aside id="carttab" class="""#));
    }

    #[tokio::test]
    async fn test_expired_page_asks_for_refresh() {
        let state = state();
        let (response, _) = send(
            app(&state),
            htmx_post(
                "/cart/add",
                "page=00000000-0000-4000-8000-000000000000&name=Mug",
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::GONE);
        assert_eq!(
            response.headers().get("hx-refresh").and_then(|v| v.to_str().ok()),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_plain_form_post_redirects_back() {
        let state = state();
        let page = open_page(&state).await;

        let request = Request::post("/cart/add")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("page={page}&name=Mug")))
            .unwrap();
        let (response, _) = send(app(&state), request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some(format!("/?page={page}").as_str())
        );
    }

    #[tokio::test]
    async fn test_overlong_name_rejected() {
        let state = state();
        let page = open_page(&state).await;
        let name = "x".repeat(201);

        let (response, _) = send(
            app(&state),
            htmx_post("/cart/add", &format!("page={page}&name={name}")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_count_for_unknown_page() {
        let state = state();
        let (response, _) = send(
            app(&state),
            get("/cart/count?page=00000000-0000-4000-8000-000000000000"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::GONE);
    }
}
