//! Bearer-authenticated admin surface.

pub mod auth;
pub mod handlers;

use axum::middleware;
use axum::routing::get;
use axum::Router;

use self::auth::admin_auth_middleware;
use crate::http::server::AppState;

/// Admin routes, mounted on the main listener when enabled.
pub fn admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(handlers::get_status))
        .route(
            "/admin/ratelimit/{key}",
            get(handlers::get_rate_limit).delete(handlers::reset_rate_limit),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
