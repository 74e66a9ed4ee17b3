//! Shared form-validation support.
//!
//! Each entity module exposes a `validate_*_input` helper that trims and
//! checks the raw form fields, returning the collected error messages next
//! to the cleaned values so a failed submission can re-render the form with
//! what the user typed.

use once_cell::sync::Lazy;
use regex::Regex;

/// The outcome of validating a form: human-readable errors plus the
/// trimmed/normalized field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T> {
    pub errors: Vec<String>,
    pub cleaned: T,
}

impl<T> Validated<T> {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\-\s()+]{7,20}$").expect("phone regex"));

/// Loose email shape check: something@something.something.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Digits plus common separators, 7-20 chars.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("sue@example.com"));
        assert!(is_valid_email("  sue@example.com  "));
        assert!(!is_valid_email("sue@example"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("555-1234"));
        assert!(is_valid_phone("(801) 555-1234"));
        assert!(is_valid_phone("+1 801 555 1234"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me maybe"));
    }
}
