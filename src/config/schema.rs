//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard
//! service. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the guard service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Per-class rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// CSRF double-submit configuration.
    pub csrf: CsrfConfig,

    /// Security hardening (response headers, body size).
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Point budget for one endpoint class.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassLimits {
    /// Requests admitted per window.
    pub points: u32,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Block duration in seconds once exhausted; 0 waits out the window.
    pub block_secs: u64,
}

/// Rate limiting configuration, one budget per endpoint class.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Authentication endpoints; strict.
    pub auth: ClassLimits,

    /// Review submission; anti-spam, daily budget.
    pub review: ClassLimits,

    /// Search endpoints; moderate.
    pub search: ClassLimits,

    /// General API; lenient.
    pub api: ClassLimits,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth: ClassLimits {
                points: 5,
                window_secs: 60 * 15,
                block_secs: 60 * 30,
            },
            review: ClassLimits {
                points: 3,
                window_secs: 60 * 60 * 24,
                block_secs: 60 * 60 * 24,
            },
            search: ClassLimits {
                points: 60,
                window_secs: 60,
                block_secs: 60 * 5,
            },
            api: ClassLimits {
                points: 100,
                window_secs: 60,
                block_secs: 60 * 2,
            },
        }
    }
}

/// CSRF double-submit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Enforce CSRF on state-changing methods.
    pub enabled: bool,

    /// HMAC signing secret for tokens.
    pub secret: String,

    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,

    /// Set the Secure attribute on the token cookie.
    pub secure_cookies: bool,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // WARNING: This is a placeholder! Change this in production.
            secret: "change-me-in-production".to_string(),
            token_ttl_secs: 60 * 60,
            secure_cookies: false,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,

    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}
