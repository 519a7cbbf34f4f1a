//! JSON API handlers exercising the validation pipeline.
//!
//! Persistence is out of scope: accepted submissions are echoed back in
//! sanitized form so callers (and tests) can observe exactly what would
//! be stored.

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::{FieldError, GuardError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::sanitize::{normalize_email, sanitize_html, sanitize_search_query, sanitize_text, SanitizePolicy};
use crate::validate::schemas;
use crate::validate::{LoginInput, RegistrationInput, ReviewSubmission, Validate};

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Mint a CSRF token: set as the double-submit cookie and returned in the
/// body for the client to echo via `X-CSRF-Token`.
pub async fn issue_csrf_token(State(state): State<AppState>) -> Result<Response, GuardError> {
    let inner = state.inner.load_full();
    let token = inner.csrf.issue()?;

    let mut response = Json(json!({
        "success": true,
        "csrfToken": token,
    }))
    .into_response();

    if let Ok(value) = HeaderValue::from_str(&inner.csrf.cookie(&token)) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// Validate and sanitize a review submission.
pub async fn submit_review(
    Json(submission): Json<ReviewSubmission>,
) -> Result<Response, GuardError> {
    submission.validate().map_err(|fields| {
        metrics::record_validation_failure("review", fields.len());
        GuardError::Validation(fields)
    })?;

    let ReviewSubmission {
        accommodation_id,
        title,
        text,
        rating,
        rating_breakdown,
        pros,
        cons,
        room_type,
        stay_duration,
    } = submission;

    let review = ReviewSubmission {
        accommodation_id,
        title: sanitize_text(&title),
        text: sanitize_html(&text, &SanitizePolicy::review()),
        rating,
        rating_breakdown,
        pros: pros.map(|items| items.iter().map(|s| sanitize_text(s)).collect()),
        cons: cons.map(|items| items.iter().map(|s| sanitize_text(s)).collect()),
        room_type: room_type.map(|s| sanitize_text(&s)),
        stay_duration: stay_duration.map(|s| sanitize_text(&s)),
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "review": review,
        })),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Sanitize then validate a search query; echoes the cleaned text.
pub async fn search(
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, GuardError> {
    let raw = params.q.ok_or_else(|| {
        GuardError::Validation(vec![FieldError::new("q", "Search query is required")])
    })?;

    let cleaned = sanitize_search_query(&raw);
    schemas::search_query(&cleaned).map_err(|fields| {
        metrics::record_validation_failure("search", fields.len());
        GuardError::Validation(fields)
    })?;

    Ok(Json(json!({
        "success": true,
        "query": cleaned,
    })))
}

/// Validate a registration request.
pub async fn register(
    Json(input): Json<RegistrationInput>,
) -> Result<Response, GuardError> {
    input.validate().map_err(|fields| {
        metrics::record_validation_failure("registration", fields.len());
        GuardError::Validation(fields)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "email": normalize_email(&input.email),
            "name": sanitize_text(&input.name),
            "university": input.university,
        })),
    )
        .into_response())
}

/// Validate login credentials (shape only; authentication is external).
pub async fn login(
    Json(input): Json<LoginInput>,
) -> Result<Json<serde_json::Value>, GuardError> {
    input.validate().map_err(|fields| {
        metrics::record_validation_failure("login", fields.len());
        GuardError::Validation(fields)
    })?;

    Ok(Json(json!({
        "success": true,
        "email": normalize_email(&input.email),
    })))
}
