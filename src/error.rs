//! Error types surfaced by the guard pipeline.
//!
//! # Design Decisions
//! - Every error is per-request and recoverable; nothing here aborts the process
//! - Validation failures carry every failed field, never just the first
//! - CSRF rejection is a security event (403), not a validation error (400)

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single failed field in a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the request body (camelCase).
    pub field: String,
    /// Human-readable message for that field.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result of running a schema over an input.
pub type ValidationResult<T> = Result<T, Vec<FieldError>>;

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum GuardError {
    /// One or more fields failed schema validation.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Point budget for the (class, client) key is exhausted.
    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited {
        limit: u32,
        retry_after_secs: u64,
        resets_at: DateTime<Utc>,
    },

    /// Double-submit CSRF check failed.
    #[error("CSRF token validation failed")]
    CsrfRejected,

    /// Token minting failed (bad key material).
    #[error("token signing failed")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}

impl GuardError {
    fn code(&self) -> &'static str {
        match self {
            GuardError::Validation(_) => "VALIDATION_ERROR",
            GuardError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            GuardError::CsrfRejected => "CSRF_REJECTED",
            GuardError::TokenSigning(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            GuardError::Validation(_) => StatusCode::BAD_REQUEST,
            GuardError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GuardError::CsrfRejected => StatusCode::FORBIDDEN,
            GuardError::TokenSigning(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "statusCode": status.as_u16(),
            }
        });

        match &self {
            GuardError::Validation(fields) => {
                body["error"]["fields"] = json!(fields);
            }
            GuardError::RateLimited {
                retry_after_secs,
                resets_at,
                ..
            } => {
                body["error"]["retryAfter"] = json!(resets_at.to_rfc3339());
                let mut response = (status, Json(body)).into_response();
                if let Ok(value) = retry_after_secs.to_string().parse() {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                return response;
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_400() {
        let err = GuardError::Validation(vec![FieldError::new("email", "Invalid email address")]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn csrf_rejection_is_forbidden_not_bad_request() {
        assert_eq!(GuardError::CsrfRejected.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn rate_limited_response_carries_retry_after() {
        let err = GuardError::RateLimited {
            limit: 5,
            retry_after_secs: 30,
            resets_at: Utc::now(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "30"
        );
    }
}
