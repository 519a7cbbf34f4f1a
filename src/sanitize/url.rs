//! URL scheme filtering and filename traversal stripping.

use url::Url;

/// Return the trimmed URL when its scheme is safe, otherwise `""`.
///
/// Allowed: `http`, `https`, `mailto` (scheme match is case-insensitive)
/// and scheme-less paths beginning with `/`. Everything else is rejected,
/// including `javascript:`, `data:` and `vbscript:`.
pub fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        return trimmed.to_string();
    }
    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https" | "mailto") => {
            trimmed.to_string()
        }
        _ => String::new(),
    }
}

/// Strip path-traversal tokens from a filename.
///
/// Directory separators and NUL bytes are removed first, then `..` is
/// removed until none remains. Overlapping tokens (`....//`) cannot
/// survive the pass.
pub fn sanitize_filename(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .collect();
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "");
    }
    cleaned.trim().to_string()
}
