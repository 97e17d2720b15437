//! Pure field validators for the contact form.
//!
//! Each validator maps a raw field value to `None` (valid) or a
//! human-readable error message. They never short-circuit each other:
//! `validate_submission` runs all of them and aggregates every error so
//! the client can fix everything in one round trip.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Submission, ValidationErrors};

/// Australian mobile: `+61` or trunk `0`, then a 4-prefixed 9-digit number.
static AU_MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+61|0)4\d{8}$").expect("valid regex"));

/// Minimal `token@token.token` shape — intentionally loose.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid regex"));

/// Name: required, trimmed length at least 2.
pub fn validate_name(name: &str) -> Option<String> {
    let v = name.trim();
    if v.is_empty() {
        return Some("Full name is required".to_string());
    }
    if v.chars().count() < 2 {
        return Some("Name is too short".to_string());
    }
    None
}

/// Phone: required. After stripping whitespace, hyphens and parentheses
/// it must match the AU mobile pattern, or contain at least 8 digits.
pub fn validate_phone(phone: &str) -> Option<String> {
    let raw = phone.trim();
    if raw.is_empty() {
        return Some("Phone number is required".to_string());
    }

    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if AU_MOBILE_RE.is_match(&normalized) {
        return None;
    }

    // Fallback: minimum digit count for landlines / international numbers.
    let digits = normalized.chars().filter(|c| c.is_ascii_digit()).count();
    if digits >= 8 {
        return None;
    }

    Some("Invalid phone number".to_string())
}

/// Email: optional. When present it must look like `token@token.token`.
pub fn validate_email(email: &str) -> Option<String> {
    let v = email.trim();
    if v.is_empty() {
        return None;
    }
    if EMAIL_RE.is_match(v) {
        None
    } else {
        Some("Invalid email address".to_string())
    }
}

/// Message: optional. When present, trimmed length at least 6.
pub fn validate_message(message: &str) -> Option<String> {
    let v = message.trim();
    if v.is_empty() {
        return None;
    }
    if v.chars().count() < 6 {
        return Some("Message is too short".to_string());
    }
    None
}

/// Run every validator and aggregate the errors. An empty map means the
/// submission is valid.
pub fn validate_submission(submission: &Submission) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Some(e) = validate_name(&submission.name) {
        errors.insert("name", e);
    }
    if let Some(e) = validate_phone(&submission.phone) {
        errors.insert("phone", e);
    }
    if let Some(e) = validate_email(&submission.email) {
        errors.insert("email", e);
    }
    if let Some(e) = validate_message(&submission.message) {
        errors.insert("message", e);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_required() {
        assert!(validate_name("").is_some());
        assert!(validate_name("   ").is_some());
    }

    #[test]
    fn single_char_name_fails_two_chars_pass() {
        assert!(validate_name("J").is_some());
        // Exactly 2 chars is the boundary and must pass.
        assert!(validate_name("Jo").is_none());
        assert!(validate_name("  Jo  ").is_none());
    }

    #[test]
    fn au_mobile_shapes_pass() {
        assert!(validate_phone("0412345678").is_none());
        assert!(validate_phone("+61412345678").is_none());
        assert!(validate_phone("0412 345 678").is_none());
        assert!(validate_phone("(04) 1234-5678").is_none());
    }

    #[test]
    fn eight_digit_fallback_passes() {
        assert!(validate_phone("95551234").is_none());
        assert!(validate_phone("+44 20 7946 0958").is_none());
    }

    #[test]
    fn short_or_missing_phone_fails() {
        assert!(validate_phone("").is_some());
        assert!(validate_phone("12345").is_some());
        assert!(validate_phone("call me").is_some());
    }

    #[test]
    fn email_optional_but_shape_checked() {
        assert!(validate_email("").is_none());
        assert!(validate_email("   ").is_none());
        assert!(validate_email("a@b.co").is_none());
        assert!(validate_email("not-an-email").is_some());
        assert!(validate_email("a@b").is_some());
    }

    #[test]
    fn message_optional_with_min_length() {
        assert!(validate_message("").is_none());
        assert!(validate_message("short").is_some()); // 5 chars
        assert!(validate_message("hello!").is_none()); // 6 chars
    }

    #[test]
    fn all_errors_reported_together() {
        let submission = Submission {
            name: "J".to_string(),
            phone: "123".to_string(),
            email: "bad".to_string(),
            message: "hi".to_string(),
            ..Default::default()
        };
        let errors = validate_submission(&submission);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("phone"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("message"));
    }

    #[test]
    fn validation_is_idempotent() {
        let submission = Submission {
            name: "J".to_string(),
            phone: "0412345678".to_string(),
            ..Default::default()
        };
        let first = validate_submission(&submission);
        let second = validate_submission(&submission);
        assert_eq!(first, second);
    }

    #[test]
    fn bad_name_rejects_regardless_of_other_fields() {
        let submission = Submission {
            name: "J".to_string(),
            phone: "0412345678".to_string(),
            email: "a@b.co".to_string(),
            message: "Fridge won't turn on".to_string(),
            ..Default::default()
        };
        let errors = validate_submission(&submission);
        assert!(errors.contains_key("name"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn valid_submission_has_no_errors() {
        let submission = Submission {
            name: "Jo".to_string(),
            phone: "0412345678".to_string(),
            message: "Fridge won't turn on".to_string(),
            ..Default::default()
        };
        assert!(validate_submission(&submission).is_empty());
    }
}
