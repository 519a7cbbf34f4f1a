//! Request ID assignment and request accounting.
//!
//! # Responsibilities
//! - Ensure every request carries an `x-request-id` (UUID v4)
//! - Echo the ID on the response for client-side correlation
//! - Record the request counter/latency metrics once per request

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::observability::metrics;
use crate::ratelimit::EndpointClass;

pub const X_REQUEST_ID: &str = "x-request-id";

pub async fn assign(mut request: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = match request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
    {
        Some(existing) => existing.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(X_REQUEST_ID, value);
            }
            id
        }
    };

    let method = request.method().to_string();
    let class = EndpointClass::from_path(request.uri().path())
        .map(|c| c.as_str())
        .unwrap_or("other");

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    metrics::record_request(&method, response.status().as_u16(), class, start);

    response
}
