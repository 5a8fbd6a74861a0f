use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::entities::contact::{is_blank, ContactSubmission};

static PHONE_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9+]").expect("phone strip pattern is valid"));
static GREEK_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+30|0030|30)?[0-9]{10}$").expect("phone pattern is valid"));

static SUSPICIOUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)on\w+\s*=",
        r"(?i)<iframe",
        r"(?i)<object",
        r"(?i)<embed",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("suspicious content pattern is valid"))
    .collect()
});

#[derive(Debug, Clone, Copy)]
pub struct FieldLimits {
    pub max_name_length: usize,
    pub max_message_length: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        FieldLimits {
            max_name_length: 100,
            max_message_length: 2000,
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Accepts Greek numbers with an optional `+30`, `0030` or `30` prefix once
/// every character other than digits and `+` has been dropped.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = PHONE_STRIP.replace_all(phone, "");
    GREEK_PHONE.is_match(&digits)
}

pub fn contains_suspicious_content(text: &str) -> bool {
    SUSPICIOUS_PATTERNS.iter().any(|p| p.is_match(text))
}

/// Runs every rule and returns all failures, in the order the form shows them.
pub fn validate_submission(submission: &ContactSubmission, limits: FieldLimits) -> Vec<String> {
    let mut errors = Vec::new();

    for (label, value) in [
        ("Name", &submission.name),
        ("Email", &submission.email),
        ("Message", &submission.message),
    ] {
        if is_blank(value) {
            errors.push(format!("{} is required", label));
        }
    }

    if !is_blank(&submission.email) && !is_valid_email(&submission.email) {
        errors.push("Invalid email address".to_string());
    }

    if !is_blank(&submission.phone) && !is_valid_phone(&submission.phone) {
        errors.push("Invalid phone number format".to_string());
    }

    if submission.name.chars().count() > limits.max_name_length {
        errors.push("Name is too long".to_string());
    }

    if submission.message.chars().count() > limits.max_message_length {
        errors.push("Message is too long".to_string());
    }

    if contains_suspicious_content(&submission.message) || contains_suspicious_content(&submission.name) {
        errors.push("Invalid content detected".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, phone: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            message: message.into(),
        }
    }

    #[test]
    fn accepts_a_complete_submission() {
        let s = submission("Maria", "maria@example.com", "+30 694 123 4567", "Is the studio free in August?");
        assert!(validate_submission(&s, FieldLimits::default()).is_empty());
    }

    #[test]
    fn reports_missing_fields_in_form_order() {
        let errors = validate_submission(&submission("", "", "", ""), FieldLimits::default());
        assert_eq!(errors, vec!["Name is required", "Email is required", "Message is required"]);
    }

    #[test]
    fn zero_counts_as_missing() {
        let errors = validate_submission(
            &submission("0", "maria@example.com", "", "0"),
            FieldLimits::default(),
        );
        assert_eq!(errors, vec!["Name is required", "Message is required"]);
    }

    #[test]
    fn greek_phone_formats() {
        assert!(is_valid_phone("6941234567"));
        assert!(is_valid_phone("+30 694 123 4567"));
        assert!(is_valid_phone("0030-694-123-4567"));
        assert!(is_valid_phone("(30) 6941234567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+44 20 7946 0958"));
    }

    #[test]
    fn lengths_are_counted_in_characters() {
        let limits = FieldLimits { max_name_length: 5, max_message_length: 10 };
        let ok = submission("Ελένη", "e@example.com", "", "Καλημέρα!!");
        assert!(validate_submission(&ok, limits).is_empty());

        let long = submission("Ελένηη", "e@example.com", "", "Καλημέρα!!!");
        assert_eq!(
            validate_submission(&long, limits),
            vec!["Name is too long", "Message is too long"]
        );
    }

    #[test]
    fn suspicious_content_is_reported_once() {
        let s = submission(
            "<script>alert(1)</script>",
            "x@example.com",
            "",
            "<iframe src=javascript:alert(1) onload=x>",
        );
        let errors = validate_submission(&s, FieldLimits::default());
        assert_eq!(errors, vec!["Invalid content detected"]);
    }

    #[test]
    fn event_handler_attributes_are_suspicious() {
        assert!(contains_suspicious_content("<img src=x OnError = alert(1)>"));
        assert!(!contains_suspicious_content("See you soon = great"));
    }

    #[test]
    fn invalid_email_and_phone_accumulate() {
        let s = submission("Nikos", "not-an-email", "abc", "Hello there, friends");
        assert_eq!(
            validate_submission(&s, FieldLimits::default()),
            vec!["Invalid email address", "Invalid phone number format"]
        );
    }
}
