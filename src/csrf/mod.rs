//! Stateless double-submit CSRF protection.
//!
//! Tokens are HS256-signed JWTs carrying `{type: "csrf", iat, exp, jti}`.
//! The server sets the token as an HttpOnly SameSite=Strict cookie; the
//! client echoes it in the `X-CSRF-Token` header on state-changing requests.
//! An attacker on another origin cannot read the cookie, so it cannot
//! produce a matching header.

use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Cookie holding the server-side token copy.
pub const CSRF_COOKIE: &str = "csrf_token";
/// Header carrying the client echo.
pub const CSRF_HEADER: &str = "x-csrf-token";

#[derive(Debug, Serialize, Deserialize)]
struct CsrfClaims {
    #[serde(rename = "type")]
    token_type: String,
    iat: u64,
    exp: u64,
    jti: String,
}

/// Token issuer/verifier. The signing secret is an explicit constructor
/// dependency sourced from configuration.
pub struct CsrfGuard {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    secure_cookies: bool,
}

impl CsrfGuard {
    pub fn new(secret: &str, ttl: Duration, secure_cookies: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            secure_cookies,
        }
    }

    /// Mint a fresh token.
    pub fn issue(&self) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = CsrfClaims {
            token_type: "csrf".to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Signature, type and expiry check for a single token.
    pub fn verify(&self, token: &str) -> bool {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<CsrfClaims>(token, &self.decoding, &validation) {
            Ok(data) => data.claims.token_type == "csrf",
            Err(_) => false,
        }
    }

    /// Double-submit check: both copies present, byte-equal, and valid.
    pub fn validate_request(&self, cookie: Option<&str>, header: Option<&str>) -> bool {
        match (cookie, header) {
            (Some(cookie), Some(header)) => cookie == header && self.verify(header),
            _ => false,
        }
    }

    /// `Set-Cookie` value for a freshly issued token.
    pub fn cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{CSRF_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            self.ttl.as_secs()
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Extract the CSRF cookie value from a request's `Cookie` header.
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(CSRF_COOKIE) {
            return parts.next().map(|v| v.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;

    fn guard() -> CsrfGuard {
        CsrfGuard::new("test-secret", Duration::from_secs(3600), false)
    }

    #[test]
    fn issued_tokens_verify() {
        let guard = guard();
        let token = guard.issue().unwrap();
        assert!(guard.verify(&token));
    }

    #[test]
    fn tampered_tokens_fail() {
        let guard = guard();
        let token = guard.issue().unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(!guard.verify(&tampered));
        assert!(!guard.verify("not-a-token"));
        assert!(!guard.verify(""));
    }

    #[test]
    fn tokens_from_another_secret_fail() {
        let other = CsrfGuard::new("other-secret", Duration::from_secs(3600), false);
        let token = other.issue().unwrap();
        assert!(!guard().verify(&token));
    }

    #[test]
    fn expired_tokens_fail() {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = CsrfClaims {
            token_type: "csrf".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(!guard().verify(&token));
    }

    #[test]
    fn wrong_type_tokens_fail() {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = CsrfClaims {
            token_type: "session".to_string(),
            iat: now,
            exp: now + 3600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(!guard().verify(&token));
    }

    #[test]
    fn double_submit_requires_byte_equality() {
        let guard = guard();
        let a = guard.issue().unwrap();
        let b = guard.issue().unwrap();
        // Both individually valid, but they are not the same token.
        assert!(guard.verify(&a));
        assert!(guard.verify(&b));
        assert!(!guard.validate_request(Some(&a), Some(&b)));
        assert!(guard.validate_request(Some(&a), Some(&a)));
        assert!(!guard.validate_request(None, Some(&a)));
        assert!(!guard.validate_request(Some(&a), None));
        assert!(!guard.validate_request(None, None));
    }

    #[test]
    fn cookie_attributes() {
        let guard = CsrfGuard::new("s", Duration::from_secs(3600), true);
        let cookie = guard.cookie("tok");
        assert!(cookie.starts_with("csrf_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("Secure"));

        let plain = CsrfGuard::new("s", Duration::from_secs(3600), false).cookie("tok");
        assert!(!plain.contains("Secure"));
    }

    #[test]
    fn cookie_token_parses_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; csrf_token=abc.def.ghi; session=xyz"),
        );
        assert_eq!(cookie_token(&headers).as_deref(), Some("abc.def.ghi"));

        let mut missing = HeaderMap::new();
        missing.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(cookie_token(&missing), None);
        assert_eq!(cookie_token(&HeaderMap::new()), None);
    }
}
