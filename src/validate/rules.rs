//! Rule primitives shared by the domain schemas.

use regex::Regex;

use crate::error::FieldError;

/// User-facing length in characters, not bytes.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub(crate) fn check_required(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
        return false;
    }
    true
}

pub(crate) fn check_min_chars(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) {
    if char_len(value) < min {
        errors.push(FieldError::new(field, message));
    }
}

pub(crate) fn check_max_chars(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    max: usize,
    message: &str,
) {
    if char_len(value) > max {
        errors.push(FieldError::new(field, message));
    }
}

pub(crate) fn check_matches(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    pattern: &Regex,
    message: &str,
) {
    if !pattern.is_match(value) {
        errors.push(FieldError::new(field, message));
    }
}

/// Reject the value when any forbidden pattern matches.
pub(crate) fn check_forbids(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    patterns: &[Regex],
    message: &str,
) {
    if patterns.iter().any(|p| p.is_match(value)) {
        errors.push(FieldError::new(field, message));
    }
}

/// Closed-interval range check for numeric inputs.
pub(crate) fn check_range(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
    message_low: &str,
    message_high: &str,
) {
    if !value.is_finite() || value < min {
        errors.push(FieldError::new(field, message_low));
    } else if value > max {
        errors.push(FieldError::new(field, message_high));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_counts_characters_not_bytes() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!("héllo".len(), 6);
    }

    #[test]
    fn range_check_is_inclusive_and_rejects_nan() {
        let mut errors = Vec::new();
        check_range(&mut errors, "rating", 1.0, 1.0, 5.0, "low", "high");
        check_range(&mut errors, "rating", 5.0, 1.0, 5.0, "low", "high");
        assert!(errors.is_empty());

        check_range(&mut errors, "rating", f64::NAN, 1.0, 5.0, "low", "high");
        assert_eq!(errors.len(), 1);
    }
}
