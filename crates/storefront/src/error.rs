//! Request errors and Sentry breadcrumbs.
//!
//! Every failure a handler can hit is the client's: an expired page or a bad
//! form. Both map straight to a 4xx response. Template rendering failures never
//! reach this type; `askama_web` answers them with a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// HTMX response header asking the client to do a full page reload.
pub const HX_REFRESH: &str = "HX-Refresh";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The page session is unknown or has expired.
    #[error("Page session expired")]
    PageExpired,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Request rejected");

        match self {
            // HTMX reloads the page, which opens a fresh session.
            Self::PageExpired => (
                StatusCode::GONE,
                [(HX_REFRESH, "true")],
                "This page has expired, please reload",
            )
                .into_response(),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a shopper action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
