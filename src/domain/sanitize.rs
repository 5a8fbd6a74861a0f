use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::contact::{ContactFields, ContactSubmission};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Strips NUL bytes, trims, and collapses every whitespace run to a single space.
///
/// Newlines in messages are collapsed as well, which also keeps CR/LF out of
/// anything that later lands in a mail header or the line-oriented log.
pub fn sanitize_input(input: &str) -> String {
    let without_nul = input.replace('\0', "");
    WHITESPACE_RUN.replace_all(without_nul.trim(), " ").into_owned()
}

pub fn sanitize_submission(fields: &ContactFields) -> ContactSubmission {
    let field = |key: &str| fields.get(key).map(sanitize_input).unwrap_or_default();

    ContactSubmission {
        name: field("name"),
        email: field("email"),
        phone: field("phone"),
        message: field("message"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nul_and_collapses_whitespace() {
        assert_eq!(sanitize_input("  Hello\0 \t\n  world  "), "Hello world");
    }

    #[test]
    fn header_injection_attempts_lose_their_line_breaks() {
        assert_eq!(
            sanitize_input("guest@example.com\r\nBcc: victim@example.com"),
            "guest@example.com Bcc: victim@example.com"
        );
    }

    #[test]
    fn missing_fields_become_empty() {
        let fields: ContactFields = [("name", " Eleni ")].into_iter().collect();
        let submission = sanitize_submission(&fields);
        assert_eq!(submission.name, "Eleni");
        assert_eq!(submission.email, "");
        assert_eq!(submission.phone, "");
    }
}
