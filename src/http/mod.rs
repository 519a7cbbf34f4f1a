//! HTTP pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack, state)
//!     → middleware/ (trace → timeout → body limit → request ID
//!                    → security headers → rate limit → CSRF)
//!     → handlers.rs (validate, sanitize, respond)
//! ```
//!
//! # Design Decisions
//! - Safe methods (GET/HEAD/OPTIONS) bypass CSRF entirely
//! - Rate limiting applies to /api paths only; class derived from path
//! - Handlers never see unvalidated input past the extractor boundary

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{AppState, GuardServer};
