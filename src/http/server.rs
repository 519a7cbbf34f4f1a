//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, security layers)
//! - Hold application state behind an atomic swap for hot reload
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::config::GuardConfig;
use crate::csrf::CsrfGuard;
use crate::http::{handlers, middleware};
use crate::ratelimit::{MemoryStore, RateLimiter, RateLimitStore};

/// State rebuilt on every config reload.
pub struct InnerState {
    pub config: GuardConfig,
    pub limiter: RateLimiter,
    pub csrf: CsrfGuard,
}

impl InnerState {
    fn build(config: GuardConfig, store: Arc<dyn RateLimitStore>) -> Self {
        let limiter = RateLimiter::new(config.rate_limit.clone(), store);
        let csrf = CsrfGuard::new(
            &config.csrf.secret,
            Duration::from_secs(config.csrf.token_ttl_secs),
            config.csrf.secure_cookies,
        );
        Self {
            config,
            limiter,
            csrf,
        }
    }
}

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
    pub started_at: Instant,
    store: Arc<dyn RateLimitStore>,
}

impl AppState {
    /// Swap in a reloaded configuration. Rate-limit counters survive the
    /// swap; in-flight requests keep the state they loaded.
    pub fn apply_config(&self, config: GuardConfig) {
        self.inner
            .store(Arc::new(InnerState::build(config, self.store.clone())));
    }
}

/// HTTP server for the guard service.
pub struct GuardServer {
    router: Router,
    state: AppState,
}

impl GuardServer {
    /// Create a server with the in-memory rate-limit store.
    pub fn new(config: GuardConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a server with an injected rate-limit store.
    pub fn with_store(config: GuardConfig, store: Arc<dyn RateLimitStore>) -> Self {
        let state = AppState {
            inner: Arc::new(ArcSwap::from_pointee(InnerState::build(
                config.clone(),
                store.clone(),
            ))),
            started_at: Instant::now(),
            store,
        };
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layer parameters (timeout, body limit) are fixed at startup; a
    /// reload swaps everything routed through `AppState` only.
    fn build_router(config: &GuardConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/csrf-token", get(handlers::issue_csrf_token))
            .route("/api/reviews", post(handlers::submit_review))
            .route("/api/search", get(handlers::search))
            .route("/api/auth/register", post(handlers::register))
            .route("/api/auth/login", post(handlers::login))
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(admin::admin_router(state.clone()));
        }

        // Request path: trace → timeout → body limit → request ID
        // → security headers → rate limit → CSRF → handler.
        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                )))
                .layer(DefaultBodyLimit::max(config.security.max_body_size))
                .layer(axum::middleware::from_fn(middleware::request_id::assign))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::security_headers::apply,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::rate_limit::enforce,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::csrf::enforce,
                )),
        )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// `config_updates` delivers validated reloads; `shutdown` ends the
    /// accept loop gracefully.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GuardConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reload_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                tracing::info!("Applying reloaded configuration");
                reload_state.apply_config(new_config);
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a handle to the application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
