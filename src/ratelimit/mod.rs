//! Rate limiting subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming /api request
//!     → limiter.rs (endpoint class from path, client identity from headers)
//!     → store.rs (per-key consume: decrement-and-check under the entry lock)
//!     → Ok(remaining, reset) or Err(retry-after)
//! ```
//!
//! # Design Decisions
//! - Store is an injected trait (`get`/`consume`/`reset`) so a distributed
//!   backing store can replace the in-memory map without contract changes
//! - Keys are independent; only same-key consumes serialize, on the entry lock
//! - Window and block timers are wall-clock instants compared lazily at each
//!   consume; no background task
//! - Endpoint class is a closed enum: an unknown class is unrepresentable

pub mod limiter;
pub mod store;

pub use limiter::{client_identity, EndpointClass, RateLimiter};
pub use store::{MemoryStore, RateLimitEntry, RateLimitExceeded, RateLimitDecision, RateLimitStore};
