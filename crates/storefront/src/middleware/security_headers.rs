//! Security headers middleware.
//!
//! Every response is locked down to same-origin resources. The only
//! cross-origin allowance is the host serving the HTMX script, taken from
//! `STOREFRONT_HTMX_SRC`.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Security headers computed once at startup.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    csp: HeaderValue,
}

impl SecurityHeaders {
    /// Build the policy for a page that loads HTMX from `htmx_src`.
    ///
    /// An absolute `http(s)` URL adds its origin to `script-src`. A
    /// same-origin path needs nothing beyond `'self'`. Key handling lives in
    /// `/static/js/keys.js`, so `'unsafe-eval'` is never granted.
    #[must_use]
    pub fn for_htmx_src(htmx_src: &str) -> Self {
        let csp = content_security_policy(script_origin(htmx_src));
        let csp = HeaderValue::from_str(&csp).unwrap_or_else(|_| {
            tracing::warn!(htmx_src, "HTMX source origin is not a valid header value");
            HeaderValue::from_static(SAME_ORIGIN_CSP)
        });
        Self { csp }
    }

    /// The `Content-Security-Policy` value.
    #[must_use]
    pub const fn csp(&self) -> &HeaderValue {
        &self.csp
    }
}

const SAME_ORIGIN_CSP: &str = "default-src 'none'; script-src 'self'; style-src 'self'; \
     img-src 'self' data:; connect-src 'self'; object-src 'none'; base-uri 'self'; \
     form-action 'self'; frame-ancestors 'none'";

fn content_security_policy(script_origin: Option<&str>) -> String {
    let script_src = script_origin.map_or_else(
        || "'self'".to_string(),
        |origin| format!("'self' {origin}"),
    );
    format!(
        "default-src 'none'; \
         script-src {script_src}; \
         style-src 'self'; \
         img-src 'self' data:; \
         connect-src 'self'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// `scheme://host[:port]` of an absolute http(s) URL.
fn script_origin(src: &str) -> Option<&str> {
    let src = src.trim();
    let rest = src
        .strip_prefix("https://")
        .or_else(|| src.strip_prefix("http://"))?;
    let host_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if host_len == 0 {
        return None;
    }
    let origin = src.get(..src.len() - rest.len() + host_len)?;
    origin
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b':' | b'/' | b'.' | b'-'))
        .then_some(origin)
}

/// Add security headers to all responses.
///
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: no-referrer`
/// - `Content-Security-Policy` (see [`SecurityHeaders::for_htmx_src`])
/// - `Permissions-Policy` denying device features
/// - `Cache-Control: no-store` unless the handler set its own
pub async fn security_headers_middleware(
    State(policy): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(CONTENT_SECURITY_POLICY, policy.csp.clone());
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), geolocation=(), microphone=(), payment=(), usb=(), interest-cohort=()",
        ),
    );

    // Cart fragments are per page session and must never be cached.
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, middleware::from_fn_with_state, routing::get};
    use tower::ServiceExt;

    use super::*;
    use crate::config::DEFAULT_HTMX_SRC;

    fn csp_for(src: &str) -> String {
        SecurityHeaders::for_htmx_src(src)
            .csp()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_script_origin() {
        assert_eq!(script_origin(DEFAULT_HTMX_SRC), Some("https://unpkg.com"));
        assert_eq!(
            script_origin("https://cdn.jsdelivr.net/npm/htmx.org@2.0.4/dist/htmx.min.js"),
            Some("https://cdn.jsdelivr.net")
        );
        assert_eq!(
            script_origin("http://localhost:8080/htmx.js"),
            Some("http://localhost:8080")
        );
        assert_eq!(script_origin("/static/js/htmx.min.js"), None);
        assert_eq!(script_origin("https://"), None);
        assert_eq!(script_origin("https://evil.example; script-src *"), None);
    }

    #[test]
    fn test_csp_follows_htmx_src() {
        let csp = csp_for("https://cdn.jsdelivr.net/npm/htmx.org@2.0.4/dist/htmx.min.js");
        assert!(csp.contains("script-src 'self' https://cdn.jsdelivr.net;"));
        assert!(!csp.contains("unpkg"));

        let csp = csp_for("/static/js/htmx.min.js");
        assert!(csp.contains("script-src 'self';"));
    }

    #[test]
    fn test_csp_never_allows_eval() {
        assert!(!csp_for(DEFAULT_HTMX_SRC).contains("unsafe-eval"));
        assert!(!csp_for("https://evil.example; script-src 'unsafe-eval'").contains("unsafe-eval"));
    }

    #[tokio::test]
    async fn test_headers_applied() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn_with_state(
                SecurityHeaders::for_htmx_src(DEFAULT_HTMX_SRC),
                security_headers_middleware,
            ));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let headers = response.headers();

        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store");
        let csp = headers.get(CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("frame-ancestors 'none'"));
        assert!(csp.contains("script-src 'self' https://unpkg.com"));
    }

    #[tokio::test]
    async fn test_keeps_handler_cache_control() {
        let app = Router::new()
            .route(
                "/",
                get(|| async { ([(CACHE_CONTROL, "public, max-age=60")], "ok") }),
            )
            .layer(from_fn_with_state(
                SecurityHeaders::for_htmx_src(DEFAULT_HTMX_SRC),
                security_headers_middleware,
            ));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "public, max-age=60"
        );
    }
}
