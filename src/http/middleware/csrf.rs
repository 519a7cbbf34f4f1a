//! CSRF enforcement middleware (double-submit pattern).
//!
//! State-changing methods on /api paths must present the token twice:
//! in the `csrf_token` cookie and the `X-CSRF-Token` header, byte-equal
//! and individually valid. Safe methods bypass the check entirely.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::csrf::{cookie_token, CSRF_HEADER};
use crate::error::GuardError;
use crate::http::server::AppState;
use crate::observability::metrics;

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let inner = state.inner.load_full();

    if !inner.config.csrf.enabled
        || is_safe(request.method())
        || !request.uri().path().starts_with("/api")
    {
        return next.run(request).await;
    }

    let cookie = cookie_token(request.headers());
    let header = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    if inner
        .csrf
        .validate_request(cookie.as_deref(), header.as_deref())
    {
        return next.run(request).await;
    }

    // Security rejection, not a validation error: log loudly.
    tracing::warn!(
        method = %request.method(),
        path = request.uri().path(),
        cookie_present = cookie.is_some(),
        header_present = header.is_some(),
        "CSRF validation failed"
    );
    metrics::record_csrf_rejection();
    GuardError::CsrfRejected.into_response()
}
