//! Input sanitization subsystem.
//!
//! # Data Flow
//! ```text
//! Raw user input (review body, search text, URLs, filenames)
//!     → html.rs (tokenize markup, walk allow-list, drop the rest)
//!     → url.rs (scheme filtering, traversal stripping)
//!     → text.rs (search query cleaning, key/email normalization)
//!     → Safe string handed to validation / storage
//! ```
//!
//! # Design Decisions
//! - Every function is total: no panics, no errors, any input in, safe string out
//! - Disallowed markup is removed, not escaped (escaping only via `escape_html`)
//! - No DOM or browser-engine dependency; a small tag tokenizer does the walk
//! - `sanitize_html` is idempotent: running it twice changes nothing

pub mod html;
pub mod text;
pub mod url;

pub use html::{escape_html, sanitize_html, sanitize_text, SanitizePolicy};
pub use text::{normalize_email, sanitize_rate_limit_key, sanitize_search_query};
pub use url::{sanitize_filename, sanitize_url};
