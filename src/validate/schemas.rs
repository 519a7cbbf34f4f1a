//! Domain schemas for every guarded input.
//!
//! Rule-for-rule port of the platform's submission contracts: student email
//! domains, password strength, review content, ratings, search queries and
//! the composite registration/review/login inputs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FieldError, ValidationResult};
use crate::validate::rules::{
    check_forbids, check_matches, check_max_chars, check_min_chars, check_range, check_required,
};
use crate::validate::Validate;

/// NSW university codes accepted at registration.
pub const UNIVERSITIES: &[&str] = &[
    "UNSW", "USYD", "UTS", "MQ", "WSU", "ACU", "ND", "UOW", "Newcastle", "UNE", "CSU", "SCU",
    "UON",
];

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email shape regex"));

static EMAIL_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9._%+-]+@(student\.)?(unsw|usyd|uts|mq|wsu|acu|nd|uow|newcastle|une|csu|scu|uon)\.edu\.au$",
    )
    .expect("email domain regex")
});

static STUDENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{6,12}$").expect("student id regex"));

static XSS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?i)<iframe",
        r"(?i)<object",
        r"(?i)<embed",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("xss pattern"))
    .collect()
});

static SQL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(select|insert|update|delete|drop|create|alter|exec|union)\b",
        r"--",
        r";",
        r"/\*",
        r"\*/",
        r"(?i)xp_",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("sql pattern"))
    .collect()
});

fn check_email(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    check_matches(errors, field, value, &EMAIL_SHAPE_RE, "Invalid email address");
    check_matches(
        errors,
        field,
        value,
        &EMAIL_DOMAIN_RE,
        "Must be a valid NSW university student email address",
    );
}

fn check_password(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    check_min_chars(errors, field, value, 8, "Password must be at least 8 characters");
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push(FieldError::new(field, "Password must contain at least one lowercase letter"));
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(FieldError::new(field, "Password must contain at least one uppercase letter"));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        errors.push(FieldError::new(field, "Password must contain at least one number"));
    }
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new(field, "Password must contain at least one special character"));
    }
}

fn check_rating(errors: &mut Vec<FieldError>, field: &str, value: f64) {
    check_range(
        errors,
        field,
        value,
        1.0,
        5.0,
        "Rating must be at least 1",
        "Rating must not exceed 5",
    );
}

fn finish(errors: Vec<FieldError>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Student email: RFC-shaped and within the NSW university domain set.
pub fn email(value: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_email(&mut errors, "email", value);
    finish(errors)
}

/// Password strength: length, case mix, digit, special character.
pub fn password(value: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_password(&mut errors, "password", value);
    finish(errors)
}

/// Review body: bounded length and free of script-bearing patterns.
pub fn review_text(value: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_min_chars(&mut errors, "text", value, 50, "Review must be at least 50 characters");
    check_max_chars(&mut errors, "text", value, 2000, "Review must not exceed 2000 characters");
    check_forbids(&mut errors, "text", value, &XSS_PATTERNS, "Review contains invalid content");
    finish(errors)
}

/// Review title: bounded length.
pub fn review_title(value: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_min_chars(&mut errors, "title", value, 10, "Title must be at least 10 characters");
    check_max_chars(&mut errors, "title", value, 100, "Title must not exceed 100 characters");
    finish(errors)
}

/// Star rating in the closed interval [1, 5]; fractional values allowed.
pub fn rating(value: f64) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_rating(&mut errors, "rating", value);
    finish(errors)
}

/// Search text: bounded length and free of SQL keyword/comment patterns.
pub fn search_query(value: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_max_chars(&mut errors, "q", value, 200, "Search query too long");
    check_forbids(&mut errors, "q", value, &SQL_PATTERNS, "Invalid search query");
    finish(errors)
}

/// Member of the fixed university code set (exact match).
pub fn university(value: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if !UNIVERSITIES.contains(&value) {
        errors.push(FieldError::new("university", "Invalid university"));
    }
    finish(errors)
}

/// Student id: 6–12 alphanumeric characters.
pub fn student_id(value: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    check_matches(&mut errors, "studentId", value, &STUDENT_ID_RE, "Invalid student ID");
    finish(errors)
}

/// Per-category star ratings accompanying a review.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBreakdown {
    pub cleanliness: f64,
    pub location: f64,
    pub value: f64,
    pub amenities: f64,
    pub management: f64,
    pub safety: f64,
}

impl RatingBreakdown {
    fn categories(&self) -> [(&'static str, f64); 6] {
        [
            ("ratingBreakdown.cleanliness", self.cleanliness),
            ("ratingBreakdown.location", self.location),
            ("ratingBreakdown.value", self.value),
            ("ratingBreakdown.amenities", self.amenities),
            ("ratingBreakdown.management", self.management),
            ("ratingBreakdown.safety", self.safety),
        ]
    }
}

/// A complete review submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub accommodation_id: String,
    pub title: String,
    pub text: String,
    pub rating: f64,
    pub rating_breakdown: RatingBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pros: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stay_duration: Option<String>,
}

impl Validate for ReviewSubmission {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if Uuid::parse_str(&self.accommodation_id).is_err() {
            errors.push(FieldError::new("accommodationId", "Invalid accommodation ID"));
        }

        check_min_chars(&mut errors, "title", &self.title, 10, "Title must be at least 10 characters");
        check_max_chars(&mut errors, "title", &self.title, 100, "Title must not exceed 100 characters");

        check_min_chars(&mut errors, "text", &self.text, 50, "Review must be at least 50 characters");
        check_max_chars(&mut errors, "text", &self.text, 2000, "Review must not exceed 2000 characters");
        check_forbids(&mut errors, "text", &self.text, &XSS_PATTERNS, "Review contains invalid content");

        check_rating(&mut errors, "rating", self.rating);
        for (field, value) in self.rating_breakdown.categories() {
            check_rating(&mut errors, field, value);
        }

        for (field, entries) in [("pros", &self.pros), ("cons", &self.cons)] {
            if let Some(entries) = entries {
                if entries.len() > 5 {
                    errors.push(FieldError::new(field, "Must not exceed 5 items"));
                }
                for entry in entries {
                    check_max_chars(&mut errors, field, entry, 100, "Item must not exceed 100 characters");
                }
            }
        }

        if let Some(room_type) = &self.room_type {
            check_max_chars(&mut errors, "roomType", room_type, 50, "Room type too long");
        }
        if let Some(stay_duration) = &self.stay_duration {
            check_max_chars(&mut errors, "stayDuration", stay_duration, 50, "Stay duration too long");
        }

        finish(errors)
    }
}

/// A registration request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub university: String,
    pub student_id: String,
}

impl Validate for RegistrationInput {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        check_email(&mut errors, "email", &self.email);
        check_password(&mut errors, "password", &self.password);

        check_min_chars(&mut errors, "name", &self.name, 2, "Name must be at least 2 characters");
        check_max_chars(&mut errors, "name", &self.name, 100, "Name too long");

        if !UNIVERSITIES.contains(&self.university.as_str()) {
            errors.push(FieldError::new("university", "Invalid university"));
        }

        check_matches(&mut errors, "studentId", &self.student_id, &STUDENT_ID_RE, "Invalid student ID");

        // Cross-field rule: runs regardless of per-field outcomes and
        // attaches to the dependent field.
        if self.password != self.confirm_password {
            errors.push(FieldError::new("confirmPassword", "Passwords don't match"));
        }

        finish(errors)
    }
}

/// A login request; only presence is checked for the password.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl Validate for LoginInput {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();
        check_email(&mut errors, "email", &self.email);
        check_required(&mut errors, "password", &self.password, "Password is required");
        finish(errors)
    }
}
