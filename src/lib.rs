//! Input validation and security gateway for a student-accommodation
//! review platform.
//!
//! Guards review, search and registration submissions against XSS,
//! SQL-injection patterns, path traversal, CSRF and abuse (rate limiting).

// Core subsystems
pub mod config;
pub mod csrf;
pub mod error;
pub mod http;
pub mod ratelimit;
pub mod sanitize;
pub mod validate;

// Cross-cutting concerns
pub mod admin;
pub mod lifecycle;
pub mod observability;

pub use config::GuardConfig;
pub use error::{FieldError, GuardError};
pub use http::GuardServer;
pub use lifecycle::Shutdown;
