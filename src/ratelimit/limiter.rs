//! Endpoint-class rate limiting over an injected store.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Utc;

use crate::config::{ClassLimits, RateLimitConfig};
use crate::ratelimit::store::{RateLimitDecision, RateLimitEntry, RateLimitExceeded, RateLimitStore};
use crate::sanitize::sanitize_rate_limit_key;

/// Traffic classes with distinct point budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Authentication endpoints; strict.
    Auth,
    /// Review submission; anti-spam, daily budget.
    Review,
    /// Search; moderate, per-minute.
    Search,
    /// Everything else under /api; lenient, per-minute.
    Api,
}

impl EndpointClass {
    /// Classify an API path. Non-API paths are not rate limited.
    pub fn from_path(path: &str) -> Option<Self> {
        if !path.starts_with("/api") {
            return None;
        }
        if path.starts_with("/api/auth") {
            Some(Self::Auth)
        } else if path.starts_with("/api/reviews") {
            Some(Self::Review)
        } else if path.starts_with("/api/search") {
            Some(Self::Search)
        } else {
            Some(Self::Api)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Review => "review",
            Self::Search => "search",
            Self::Api => "api",
        }
    }
}

/// Per-class limiter facade over the store.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, store: Arc<dyn RateLimitStore>) -> Self {
        Self { store, config }
    }

    fn limits(&self, class: EndpointClass) -> &ClassLimits {
        match class {
            EndpointClass::Auth => &self.config.auth,
            EndpointClass::Review => &self.config.review,
            EndpointClass::Search => &self.config.search,
            EndpointClass::Api => &self.config.api,
        }
    }

    /// Store key for a (class, client) pair.
    pub fn key(class: EndpointClass, client: &str) -> String {
        format!("{}:{}", class.as_str(), sanitize_rate_limit_key(client))
    }

    /// Consume one point for the client within the class budget.
    pub fn consume(
        &self,
        class: EndpointClass,
        client: &str,
    ) -> Result<RateLimitDecision, RateLimitExceeded> {
        let key = Self::key(class, client);
        self.store.consume(&key, self.limits(class), Utc::now())
    }

    /// Inspect the raw state for a store key.
    pub fn inspect(&self, key: &str) -> Option<RateLimitEntry> {
        self.store.get(key)
    }

    /// Clear the state for a store key.
    pub fn reset(&self, key: &str) {
        self.store.reset(key);
    }
}

/// Derive the client identity for rate limiting.
///
/// First of: `x-forwarded-for` (first hop), `x-real-ip`, the connection
/// peer address. Proxied deployments must ensure the forwarding headers
/// are trustworthy before this runs.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
