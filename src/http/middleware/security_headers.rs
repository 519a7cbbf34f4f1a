//! Security response headers.
//!
//! # Responsibilities
//! - Attach the hardening header set to every response
//! - Keep the set static; per-route variation is not supported

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::http::server::AppState;

/// Header set applied to every response when enabled.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    (
        "permissions-policy",
        "camera=(), microphone=(), geolocation=(), interest-cohort=()",
    ),
    (
        "content-security-policy",
        "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' data: https:; \
         connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'",
    ),
];

pub async fn apply(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let enabled = state.inner.load().config.security.enable_headers;
    let mut response = next.run(request).await;

    if enabled {
        let headers = response.headers_mut();
        for (name, value) in SECURITY_HEADERS {
            headers.insert(*name, HeaderValue::from_static(value));
        }
    }

    response
}
