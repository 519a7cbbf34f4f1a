//! Allow-list HTML sanitization over a hand-written tag tokenizer.
//!
//! # Responsibilities
//! - Remove every element/attribute outside the configured allow-list
//! - Preserve text content of removed (non-script-bearing) elements
//! - Drop script-bearing constructs together with their content
//! - Re-emit allowed markup in a normalized form so the pass is idempotent

use std::collections::HashSet;

use crate::sanitize::url::sanitize_url;

/// Elements whose raw content must never survive, regardless of policy.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed", "noscript"];

/// Attributes carrying URIs; values pass through the URL sanitizer.
const URI_ATTRS: &[&str] = &["href", "src", "action", "formaction", "xlink:href"];

/// Allow-list of tags (and attributes) permitted in sanitized output.
#[derive(Debug, Clone, Default)]
pub struct SanitizePolicy {
    allowed_tags: HashSet<String>,
    allowed_attrs: HashSet<String>,
}

impl SanitizePolicy {
    /// Policy that strips all markup.
    pub fn none() -> Self {
        Self::default()
    }

    /// Basic formatting for general rich-text input.
    pub fn rich_text() -> Self {
        Self::custom(&["b", "i", "em", "strong", "p", "br", "ul", "ol", "li"], &[])
    }

    /// Review bodies: paragraphs and emphasis only.
    pub fn review() -> Self {
        Self::custom(&["p", "br", "strong", "em"], &[])
    }

    /// Build a policy from explicit tag and attribute lists.
    ///
    /// Script-bearing elements are refused at sanitization time even when
    /// listed here.
    pub fn custom(tags: &[&str], attrs: &[&str]) -> Self {
        Self {
            allowed_tags: tags.iter().map(|t| t.to_ascii_lowercase()).collect(),
            allowed_attrs: attrs.iter().map(|a| a.to_ascii_lowercase()).collect(),
        }
    }

    fn allows_tag(&self, name: &str) -> bool {
        self.allowed_tags.contains(name) && !RAW_TEXT_ELEMENTS.contains(&name)
    }

    fn allows_attr(&self, name: &str) -> bool {
        self.allowed_attrs.contains(name)
    }
}

/// One parsed markup construct at the head of the input.
enum Markup {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
        len: usize,
    },
    Close {
        name: String,
        len: usize,
    },
    /// Comment, doctype or processing instruction; dropped whole.
    Skip { len: usize },
    /// A `<` that does not start markup; dropped as a lone character.
    StrayLt,
    /// Markup never terminated; the remainder of the input is dropped.
    Unterminated,
}

/// Remove every element and attribute not allowed by `policy`.
///
/// Text content of removed elements is preserved, except for
/// script-bearing elements whose content is dropped with them. Output
/// contains allowed tags in normalized lowercase form only, so a second
/// pass is a no-op.
pub fn sanitize_html(input: &str, policy: &SanitizePolicy) -> String {
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let rest = &input[i..];
        match rest.find('<') {
            None => {
                out.push_str(rest);
                break;
            }
            Some(lt) => {
                out.push_str(&rest[..lt]);
                i += lt;
            }
        }

        match parse_markup(&input[i..]) {
            Markup::Open { name, attrs, len } => {
                i += len;
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    i += skip_raw_content(&input[i..], &name);
                } else if policy.allows_tag(&name) {
                    emit_open_tag(&mut out, &name, &attrs, policy);
                }
                // Disallowed tag: dropped, content flows through.
            }
            Markup::Close { name, len } => {
                i += len;
                if policy.allows_tag(&name) {
                    out.push_str("</");
                    out.push_str(&name);
                    out.push('>');
                }
            }
            Markup::Skip { len } => i += len,
            Markup::StrayLt => i += 1,
            Markup::Unterminated => break,
        }
    }

    out
}

/// `sanitize_html` with the empty allow-list: strips all markup, keeps text.
pub fn sanitize_text(input: &str) -> String {
    sanitize_html(input, &SanitizePolicy::none())
}

/// Escape the five HTML-special characters to their entities.
///
/// One-directional; everything else passes through untouched.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn emit_open_tag(out: &mut String, name: &str, attrs: &[(String, String)], policy: &SanitizePolicy) {
    out.push('<');
    out.push_str(name);

    for (attr, value) in attrs {
        if attr.starts_with("on") || !policy.allows_attr(attr) {
            continue;
        }
        let value = if URI_ATTRS.contains(&attr.as_str()) {
            let safe = sanitize_url(value);
            if safe.is_empty() {
                continue;
            }
            safe
        } else {
            value.clone()
        };
        // Angle brackets are stripped rather than escaped so re-sanitizing
        // the output cannot shift the value.
        let value: String = value.chars().filter(|c| *c != '<' && *c != '>').collect();
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }

    out.push('>');
}

/// Parse the markup construct starting at `input` (which begins with `<`).
fn parse_markup(input: &str) -> Markup {
    let bytes = input.as_bytes();
    if bytes.len() < 2 {
        return Markup::StrayLt;
    }

    match bytes[1] {
        b'!' | b'?' => {
            if input.starts_with("<!--") {
                match input.find("-->") {
                    Some(end) => Markup::Skip { len: end + 3 },
                    None => Markup::Unterminated,
                }
            } else {
                match input.find('>') {
                    Some(end) => Markup::Skip { len: end + 1 },
                    None => Markup::Unterminated,
                }
            }
        }
        b'/' => {
            let name = read_tag_name(&bytes[2..]);
            if name.is_empty() {
                return match input.find('>') {
                    Some(end) => Markup::Skip { len: end + 1 },
                    None => Markup::Unterminated,
                };
            }
            match input.find('>') {
                Some(end) => Markup::Close { name, len: end + 1 },
                None => Markup::Unterminated,
            }
        }
        c if c.is_ascii_alphabetic() => parse_open_tag(input),
        _ => Markup::StrayLt,
    }
}

fn read_tag_name(bytes: &[u8]) -> String {
    if bytes.first().map(|b| b.is_ascii_alphabetic()) != Some(true) {
        return String::new();
    }
    let end = bytes
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'-'))
        .unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).to_ascii_lowercase()
}

fn parse_open_tag(input: &str) -> Markup {
    let bytes = input.as_bytes();
    let name = read_tag_name(&bytes[1..]);
    let mut i = 1 + name.len();
    let mut attrs = Vec::new();

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return Markup::Unterminated;
        }
        if bytes[i] == b'>' {
            return Markup::Open {
                name,
                attrs,
                len: i + 1,
            };
        }

        // Attribute name.
        let start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == start {
            // No progress (e.g. a bare '='); skip the byte.
            i += 1;
            continue;
        }
        let attr = String::from_utf8_lossy(&bytes[start..i]).to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Markup::Unterminated;
                }
                value = input[start..i].to_string();
                i += 1;
            } else {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                value = input[start..i].to_string();
            }
        }

        attrs.push((attr, value));
    }
}

/// Length of the raw content (and closing tag) of a script-bearing element.
fn skip_raw_content(rest: &str, name: &str) -> usize {
    let lower = rest.to_ascii_lowercase();
    let needle = format!("</{name}");
    let mut from = 0;
    while let Some(pos) = lower[from..].find(&needle) {
        let pos = from + pos;
        let tail = &lower[pos + needle.len()..];
        let after_ws = tail.len() - tail.trim_start().len();
        if tail[after_ws..].starts_with('>') {
            return pos + needle.len() + after_ws + 1;
        }
        from = pos + needle.len();
    }
    rest.len()
}
