//! Per-class rate limiting middleware.
//!
//! # Responsibilities
//! - Derive endpoint class from the request path
//! - Derive client identity from forwarding headers / peer address
//! - Consume one point and attach X-RateLimit-* headers
//! - Reject with 429 + Retry-After once the budget is exhausted

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::GuardError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::ratelimit::{client_identity, EndpointClass};

pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let inner = state.inner.load_full();

    let class = match EndpointClass::from_path(request.uri().path()) {
        Some(class) if inner.config.rate_limit.enabled => class,
        _ => return next.run(request).await,
    };

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client = client_identity(request.headers(), peer);

    match inner.limiter.consume(class, &client) {
        Ok(decision) => {
            let mut response = next.run(request).await;
            insert_limit_headers(
                response.headers_mut(),
                decision.limit,
                decision.remaining,
                decision.resets_at,
            );
            response
        }
        Err(exceeded) => {
            tracing::warn!(
                client = %client,
                class = class.as_str(),
                "Rate limit exceeded"
            );
            metrics::record_rate_limited(class.as_str());

            let retry_after_secs = exceeded.retry_after_secs(Utc::now());
            let mut response = GuardError::RateLimited {
                limit: exceeded.limit,
                retry_after_secs,
                resets_at: exceeded.resets_at,
            }
            .into_response();
            insert_limit_headers(response.headers_mut(), exceeded.limit, 0, exceeded.resets_at);
            response
        }
    }
}

fn insert_limit_headers(
    headers: &mut HeaderMap,
    limit: u32,
    remaining: u32,
    resets_at: DateTime<Utc>,
) {
    if let Ok(value) = HeaderValue::from_str(&limit.to_string()) {
        headers.insert("x-ratelimit-limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert("x-ratelimit-remaining", value);
    }
    let reset = resets_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(value) = HeaderValue::from_str(&reset) {
        headers.insert("x-ratelimit-reset", value);
    }
}
