//! Plain-text cleaners for search queries, store keys and email addresses.

/// Maximum length of a search query after cleaning.
const SEARCH_QUERY_MAX: usize = 200;

/// Strip injection-prone characters from free-text search input.
///
/// Removes angle brackets, quotes and statement terminators, trims, and
/// truncates to 200 characters.
pub fn sanitize_search_query(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ';' | '\'' | '"'))
        .collect();
    cleaned.trim().chars().take(SEARCH_QUERY_MAX).collect()
}

/// Normalize a string for use as a rate-limiter store key.
///
/// Anything outside `[A-Za-z0-9:-]` becomes `_` so client-supplied header
/// values cannot inject into key space.
pub fn sanitize_rate_limit_key(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ':' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Lowercase and trim an email address.
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}
