use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// JSON body returned by the contact endpoint, successful or not.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
}

impl ContactResponse {
    pub fn success(message: impl Into<String>) -> Self {
        ContactResponse {
            success: true,
            message: message.into(),
            errors: None,
            debug_info: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ContactResponse {
            success: false,
            message: message.into(),
            errors: None,
            debug_info: None,
        }
    }

    pub fn failure_with_errors(message: impl Into<String>, errors: Vec<String>) -> Self {
        ContactResponse {
            errors: Some(errors),
            ..Self::failure(message)
        }
    }
}

/// Extra fields exposed when the service runs in debug mode with the spool transport.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DebugInfo {
    pub test_email_file: String,
    pub log_file: String,
    pub ip: String,
}

/// Raw form fields as posted by the browser, keyed by input name.
#[derive(Debug, Default, Clone)]
pub struct ContactFields(pub HashMap<String, String>);

impl ContactFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_filled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !is_blank(v))
    }
}

/// Empty, or the literal `"0"`, which the site's form handling has always
/// treated as no value.
pub fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "0"
}

impl<K, V> FromIterator<(K, V)> for ContactFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ContactFields(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A submission after sanitisation; field values are normalised plain text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Request details that travel with a submission into the e-mail and the log.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub client_ip: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub received_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
    pub sent_at: NaiveDateTime,
}

impl OutgoingEmail {
    /// Renders the message with RFC 5322 headers, CRLF line endings throughout.
    pub fn to_rfc5322(&self) -> String {
        let headers = [
            format!("To: {}", self.to),
            format!("From: {}", self.from),
            format!("Reply-To: {}", self.reply_to),
            format!("Subject: {}", self.subject),
            format!("X-Mailer: akrotopi-backend/{}", env!("CARGO_PKG_VERSION")),
            "Content-Type: text/plain; charset=UTF-8".to_string(),
            "MIME-Version: 1.0".to_string(),
        ];
        let body = self.body.replace("\r\n", "\n").replace('\n', "\r\n");
        format!("{}\r\n\r\n{}", headers.join("\r\n"), body)
    }
}

/// What a mail transport did with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum MailReceipt {
    Sent,
    Spooled { file_name: String },
}
