//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (points > 0, windows > 0, timeouts > 0)
//! - Check addresses parse and secrets are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{ClassLimits, GuardConfig};

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidMetricsAddress(String),
    ZeroRequestTimeout,
    ZeroBodyLimit,
    ZeroPoints(&'static str),
    ZeroWindow(&'static str),
    EmptyCsrfSecret,
    ShortCsrfSecret(usize),
    ZeroCsrfTtl,
    EmptyAdminKey,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address '{}' is not a socket address", addr)
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address '{}' is not a socket address", addr)
            }
            ValidationError::ZeroRequestTimeout => write!(f, "timeouts.request_secs must be > 0"),
            ValidationError::ZeroBodyLimit => write!(f, "security.max_body_size must be > 0"),
            ValidationError::ZeroPoints(class) => {
                write!(f, "rate_limit.{}.points must be > 0", class)
            }
            ValidationError::ZeroWindow(class) => {
                write!(f, "rate_limit.{}.window_secs must be > 0", class)
            }
            ValidationError::EmptyCsrfSecret => write!(f, "csrf.secret must not be empty"),
            ValidationError::ShortCsrfSecret(len) => {
                write!(f, "csrf.secret is {} bytes; at least 16 required", len)
            }
            ValidationError::ZeroCsrfTtl => write!(f, "csrf.token_ttl_secs must be > 0"),
            ValidationError::EmptyAdminKey => {
                write!(f, "admin.api_key must not be empty when admin is enabled")
            }
        }
    }
}

fn check_class(class: &'static str, limits: &ClassLimits, errors: &mut Vec<ValidationError>) {
    if limits.points == 0 {
        errors.push(ValidationError::ZeroPoints(class));
    }
    if limits.window_secs == 0 {
        errors.push(ValidationError::ZeroWindow(class));
    }
}

/// Semantic checks over a parsed configuration; collects every error.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.rate_limit.enabled {
        check_class("auth", &config.rate_limit.auth, &mut errors);
        check_class("review", &config.rate_limit.review, &mut errors);
        check_class("search", &config.rate_limit.search, &mut errors);
        check_class("api", &config.rate_limit.api, &mut errors);
    }

    if config.csrf.enabled {
        if config.csrf.secret.is_empty() {
            errors.push(ValidationError::EmptyCsrfSecret);
        } else if config.csrf.secret.len() < 16 {
            errors.push(ValidationError::ShortCsrfSecret(config.csrf.secret.len()));
        }
        if config.csrf.token_ttl_secs == 0 {
            errors.push(ValidationError::ZeroCsrfTtl);
        }
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::EmptyAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
