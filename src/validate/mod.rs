//! Schema validation subsystem.
//!
//! # Data Flow
//! ```text
//! Deserialized request body / query param
//!     → rules.rs (length, range, pattern primitives)
//!     → schemas.rs (per-domain rule sets, composite inputs)
//!     → Ok(()) or Vec<FieldError> listing every failed field
//! ```
//!
//! # Design Decisions
//! - All rules run and failures accumulate; callers always see the full list
//! - Cross-field rules (password confirmation) attach to the dependent field
//! - Field names in errors match the request body casing (camelCase)
//! - Pure functions; safe under unrestricted parallel invocation

pub mod rules;
pub mod schemas;

pub use schemas::{
    LoginInput, RatingBreakdown, RegistrationInput, ReviewSubmission, UNIVERSITIES,
};

use crate::error::ValidationResult;

/// Composite inputs validated as a whole.
pub trait Validate {
    /// Run every rule, collecting all failures.
    fn validate(&self) -> ValidationResult<()>;
}
