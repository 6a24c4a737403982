//! Integration tests for Bazaar.
//!
//! Each test starts its own storefront on an ephemeral port and talks to it
//! over HTTP with `reqwest`, the same way a browser running HTMX would.
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use bazaar_core::CatalogError;
use bazaar_storefront::catalog::CatalogStore;
use bazaar_storefront::config::{PageSessionConfig, StorefrontConfig};
use bazaar_storefront::routes;
use bazaar_storefront::state::AppState;
use reqwest::{Client, Response, redirect};
use thiserror::Error;

/// Catalog used by the integration tests.
pub const TEST_CATALOG: &str = r#"{
    "products": [
        { "title": "Mug", "price": "PKR 500" },
        { "title": "Cap", "price": "PKR 900" },
        { "title": "Capsule", "price": "PKR 100" },
        { "title": "Tote", "price": "PKR 750" }
    ],
    "initial_cart": [{ "name": "Mug", "quantity": 1 }]
}"#;

/// A running storefront plus an HTTP client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

/// Errors starting a test server.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("invalid test catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("failed to bind test server: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl TestContext {
    /// Start a storefront with the test catalog and default page limits.
    ///
    /// # Errors
    ///
    /// Returns `StartError` if the catalog is invalid or the server cannot bind.
    pub async fn new() -> Result<Self, StartError> {
        Self::with_pages(PageSessionConfig::default()).await
    }

    /// Start a storefront with custom page session limits.
    ///
    /// # Errors
    ///
    /// Returns `StartError` if the catalog is invalid or the server cannot bind.
    pub async fn with_pages(pages: PageSessionConfig) -> Result<Self, StartError> {
        let catalog = CatalogStore::from_json(TEST_CATALOG)?;
        let config = StorefrontConfig {
            port: 0,
            pages,
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, catalog);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            // The server runs until the test runtime shuts down
            let _ = axum::serve(listener, routes::app(state)).await;
        });

        // Redirects are asserted on, not followed
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("http://{addr}"),
        })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Load the storefront page and return its page id.
    ///
    /// # Errors
    ///
    /// Returns the request error if the page cannot be fetched.
    pub async fn open_page(&self) -> Result<(String, String), reqwest::Error> {
        let body = self.client.get(self.url("/")).send().await?.text().await?;
        Ok((page_id(&body), body))
    }

    /// POST a form the way HTMX does.
    ///
    /// # Errors
    ///
    /// Returns the request error if the request fails.
    pub async fn htmx_post(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
    }

    /// GET a fragment the way HTMX does.
    ///
    /// # Errors
    ///
    /// Returns the request error if the request fails.
    pub async fn htmx_get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(self.url(path))
            .header("HX-Request", "true")
            .send()
            .await
    }
}

/// Pull the page id out of a rendered page or fragment.
#[must_use]
pub fn page_id(html: &str) -> String {
    let marker = r#"name="page" value=""#;
    html.find(marker)
        .and_then(|start| html.get(start + marker.len()..start + marker.len() + 36))
        .unwrap_or_default()
        .to_string()
}

/// Read the number in the `#cart-count` badge.
#[must_use]
pub fn cart_count(html: &str) -> Option<u64> {
    let start = html.find(r#"id="cart-count""#)?;
    let rest = html.get(start..)?;
    let open = rest.find('>')? + 1;
    let close = rest.find("</span>")?;
    rest.get(open..close)?.trim().parse().ok()
}
