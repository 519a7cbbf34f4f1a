use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub rate_limit_enabled: bool,
    pub csrf_enabled: bool,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load_full();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
        rate_limit_enabled: inner.config.rate_limit.enabled,
        csrf_enabled: inner.config.csrf.enabled,
    })
}

/// Inspect the limiter state for a store key (e.g. `search:10_0_0_1`).
pub async fn get_rate_limit(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Response {
    let inner = state.inner.load_full();
    match inner.limiter.inspect(&key) {
        Some(entry) => Json(json!({ "key": key, "state": entry })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "code": "NOT_FOUND", "message": "No state for key" } })),
        )
            .into_response(),
    }
}

/// Clear the limiter state for a store key, restoring full capacity.
pub async fn reset_rate_limit(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<serde_json::Value> {
    let inner = state.inner.load_full();
    inner.limiter.reset(&key);
    tracing::info!(key = %key, "Rate limit state reset");
    Json(json!({ "success": true, "key": key }))
}
