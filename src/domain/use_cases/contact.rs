use std::sync::Arc;

use chrono::Utc;

use crate::{
    entities::{
        contact::{ContactFields, ContactResponse, ContactSubmission, DebugInfo, MailReceipt, OutgoingEmail, RequestMeta},
        submission::{NewSubmissionEntry, LOG_TIMESTAMP_FORMAT},
    },
    errors::AppError,
    repositories::{mailer::Mailer, rate_limit::RateLimitStore, submission_log::SubmissionLog},
    sanitize::sanitize_submission,
    settings::AppConfig,
    validation::{validate_submission, FieldLimits},
};

pub const SUCCESS_MESSAGE: &str = "Thank you for your message! We will get back to you soon.";

/// Settings the contact pipeline reads on every request.
#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub site_name: String,
    pub email_to: String,
    pub email_from: String,
    pub email_subject_prefix: String,
    pub include_ip_in_email: bool,
    pub include_user_agent: bool,
    pub honeypot_field: String,
    pub limits: FieldLimits,
    pub log_submissions: bool,
    pub local_testing: bool,
    pub debug_mode: bool,
}

impl From<&AppConfig> for ContactSettings {
    fn from(config: &AppConfig) -> Self {
        ContactSettings {
            site_name: config.site_name.clone(),
            email_to: config.email_to.clone(),
            email_from: config.email_from.clone(),
            email_subject_prefix: config.email_subject_prefix.clone(),
            include_ip_in_email: config.include_ip_in_email,
            include_user_agent: config.include_user_agent,
            honeypot_field: config.honeypot_field.clone(),
            limits: FieldLimits {
                max_name_length: config.max_name_length,
                max_message_length: config.max_message_length,
            },
            log_submissions: config.log_submissions,
            local_testing: config.local_testing,
            debug_mode: config.debug_mode,
        }
    }
}

pub struct ContactHandler {
    pub settings: ContactSettings,
    pub mailer: Arc<dyn Mailer>,
    pub rate_limiter: Arc<dyn RateLimitStore>,
    pub submission_log: Arc<dyn SubmissionLog>,
}

impl ContactHandler {
    pub fn new(
        settings: ContactSettings,
        mailer: Arc<dyn Mailer>,
        rate_limiter: Arc<dyn RateLimitStore>,
        submission_log: Arc<dyn SubmissionLog>,
    ) -> Self {
        ContactHandler {
            settings,
            mailer,
            rate_limiter,
            submission_log,
        }
    }

    /// Runs a submission through rate limiting, the honeypot, sanitising,
    /// validation, mail dispatch and logging, stopping at the first failure.
    pub async fn submit(
        &self,
        fields: ContactFields,
        meta: RequestMeta,
    ) -> Result<ContactResponse, AppError> {
        let ip = meta.client_ip.as_str();

        if !self.rate_limiter.check_and_record(ip, Utc::now().timestamp()).await? {
            tracing::warn!(client_ip = %ip, "Contact form rate limit exceeded");
            return Err(AppError::RateLimited);
        }

        if fields.is_filled(&self.settings.honeypot_field) {
            tracing::warn!(client_ip = %ip, "Contact form honeypot triggered");
            return Err(AppError::InvalidSubmission);
        }

        let submission = sanitize_submission(&fields);
        if self.settings.debug_mode {
            tracing::debug!(client_ip = %ip, ?submission, "Sanitised contact submission");
        }

        let errors = validate_submission(&submission, self.settings.limits);
        if !errors.is_empty() {
            tracing::info!(client_ip = %ip, ?errors, "Contact form validation failed");
            return Err(AppError::ValidationFailed(errors));
        }

        let email = self.compose_email(&submission, &meta);
        let receipt = self.mailer.send(&email).await.map_err(|e| {
            tracing::error!(
                transport = self.mailer.transport_name(),
                "Failed to send contact form email for {}: {}",
                submission.email,
                e
            );
            AppError::MailFailure
        })?;

        if self.settings.log_submissions {
            let entry = NewSubmissionEntry {
                submitted_at: meta.received_at,
                name: submission.name.clone(),
                email: submission.email.clone(),
                ip: meta.client_ip.clone(),
                local_test: self.settings.local_testing,
            };
            if let Err(e) = self.submission_log.append(&entry).await {
                tracing::error!(client_ip = %ip, "Failed to log contact submission: {}", e);
            }
        }

        tracing::info!(client_ip = %ip, "Contact form submitted");
        Ok(self.success_response(receipt, &meta))
    }

    pub fn compose_email(&self, submission: &ContactSubmission, meta: &RequestMeta) -> OutgoingEmail {
        let s = &self.settings;
        let phone = if submission.phone.is_empty() { "Not provided" } else { &submission.phone };
        let test_marker = if s.local_testing { " (LOCAL TEST)" } else { "" };

        let mut body = format!(
            "New contact form submission from {} website{}:\n\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\n\
             Message:\n{}\n\n\
             ---\n\
             Submitted on: {}\n",
            s.site_name,
            test_marker,
            submission.name,
            submission.email,
            phone,
            submission.message,
            meta.received_at.format(LOG_TIMESTAMP_FORMAT),
        );
        if s.include_ip_in_email {
            body.push_str(&format!("IP Address: {}\n", meta.client_ip));
        }
        if s.include_user_agent {
            body.push_str(&format!("User Agent: {}\n", meta.user_agent.as_deref().unwrap_or("Unknown")));
        }
        body.push_str(&format!("Referrer: {}\n", meta.referrer.as_deref().unwrap_or("Direct access")));
        if s.local_testing {
            body.push_str("Local Testing: YES\n");
        }

        OutgoingEmail {
            to: s.email_to.clone(),
            from: s.email_from.clone(),
            reply_to: submission.email.clone(),
            subject: format!("{}New Contact Form Submission", s.email_subject_prefix),
            body,
            sent_at: meta.received_at,
        }
    }

    fn success_response(&self, receipt: MailReceipt, meta: &RequestMeta) -> ContactResponse {
        match receipt {
            MailReceipt::Spooled { file_name } if self.settings.debug_mode => ContactResponse {
                debug_info: Some(DebugInfo {
                    test_email_file: file_name.clone(),
                    log_file: self.submission_log.location(),
                    ip: meta.client_ip.clone(),
                }),
                ..ContactResponse::success(format!(
                    "Thank you for your message! (Local test - email saved to: {})",
                    file_name
                ))
            },
            _ => ContactResponse::success(SUCCESS_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::{MailError, StorageError},
        repositories::{mailer::MockMailer, rate_limit::MockRateLimitStore, submission_log::MockSubmissionLog},
        settings::AppEnvironment,
    };
    use chrono::NaiveDate;

    fn settings() -> ContactSettings {
        ContactSettings::from(&AppConfig::defaults(AppEnvironment::Testing))
    }

    fn meta() -> RequestMeta {
        RequestMeta {
            client_ip: "203.0.113.7".into(),
            user_agent: Some("Mozilla/5.0".into()),
            referrer: None,
            received_at: NaiveDate::from_ymd_opt(2024, 9, 14).unwrap().and_hms_opt(18, 45, 0).unwrap(),
        }
    }

    fn valid_fields() -> ContactFields {
        [
            ("name", "Maria Papadopoulou"),
            ("email", "maria@example.com"),
            ("phone", "+30 694 123 4567"),
            ("message", "Do you have a studio free for the first week of August?"),
            ("website", ""),
        ]
        .into_iter()
        .collect()
    }

    fn allowing_limiter() -> MockRateLimitStore {
        let mut limiter = MockRateLimitStore::new();
        limiter.expect_check_and_record().returning(|_, _| Ok(true));
        limiter
    }

    fn handler(mailer: MockMailer, limiter: MockRateLimitStore, log: MockSubmissionLog) -> ContactHandler {
        ContactHandler::new(settings(), Arc::new(mailer), Arc::new(limiter), Arc::new(log))
    }

    #[actix_rt::test]
    async fn successful_submission_sends_and_logs() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| email.reply_to == "maria@example.com" && email.subject.ends_with("New Contact Form Submission"))
            .times(1)
            .returning(|_| Ok(MailReceipt::Sent));

        let mut log = MockSubmissionLog::new();
        log.expect_append()
            .withf(|entry| entry.to_log_line()
                == "2024-09-14 18:45:00 - Contact form submitted by Maria Papadopoulou (maria@example.com) from IP 203.0.113.7")
            .times(1)
            .returning(|_| Ok(()));

        let response = handler(mailer, allowing_limiter(), log)
            .submit(valid_fields(), meta())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.message, SUCCESS_MESSAGE);
        assert!(response.debug_info.is_none());
    }

    #[actix_rt::test]
    async fn rate_limited_requests_stop_before_anything_else() {
        let mut limiter = MockRateLimitStore::new();
        limiter.expect_check_and_record().returning(|_, _| Ok(false));

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let mut log = MockSubmissionLog::new();
        log.expect_append().never();

        let err = handler(mailer, limiter, log).submit(valid_fields(), meta()).await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited));
    }

    #[actix_rt::test]
    async fn honeypot_rejects_bots() {
        let mut fields = valid_fields();
        fields.0.insert("website".into(), "http://spam.example".into());

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let err = handler(mailer, allowing_limiter(), MockSubmissionLog::new())
            .submit(fields, meta())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidSubmission));
    }

    #[actix_rt::test]
    async fn validation_failures_list_every_problem() {
        let fields: ContactFields = [("name", "  "), ("email", "nope"), ("message", "hi")].into_iter().collect();

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let err = handler(mailer, allowing_limiter(), MockSubmissionLog::new())
            .submit(fields, meta())
            .await
            .unwrap_err();
        match err {
            AppError::ValidationFailed(errors) => {
                assert_eq!(errors, vec!["Name is required", "Invalid email address"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_rt::test]
    async fn mail_failure_is_not_logged() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(|_| Err(MailError::TransportStatus("exit status: 75".into())));
        mailer.expect_transport_name().return_const("sendmail");

        let mut log = MockSubmissionLog::new();
        log.expect_append().never();

        let err = handler(mailer, allowing_limiter(), log)
            .submit(valid_fields(), meta())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MailFailure));
    }

    #[actix_rt::test]
    async fn log_failure_after_sending_still_succeeds() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(MailReceipt::Sent));

        let mut log = MockSubmissionLog::new();
        log.expect_append().times(1).returning(|_| {
            Err(StorageError::Io { path: "contact_log.txt".into(), message: "read-only fs".into() })
        });

        let response = handler(mailer, allowing_limiter(), log)
            .submit(valid_fields(), meta())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.message, SUCCESS_MESSAGE);
    }

    #[actix_rt::test]
    async fn zero_honeypot_value_counts_as_empty() {
        let mut fields = valid_fields();
        fields.0.insert("website".into(), "0".into());

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(MailReceipt::Sent));
        let mut log = MockSubmissionLog::new();
        log.expect_append().returning(|_| Ok(()));

        let response = handler(mailer, allowing_limiter(), log).submit(fields, meta()).await.unwrap();
        assert!(response.success);
    }

    #[actix_rt::test]
    async fn limiter_storage_errors_surface_as_internal() {
        let mut limiter = MockRateLimitStore::new();
        limiter.expect_check_and_record().returning(|_, _| {
            Err(StorageError::Io { path: "/tmp/rl.json".into(), message: "denied".into() })
        });

        let err = handler(MockMailer::new(), limiter, MockSubmissionLog::new())
            .submit(valid_fields(), meta())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[actix_rt::test]
    async fn debug_mode_reports_spooled_file() {
        let mut settings = settings();
        settings.debug_mode = true;
        settings.local_testing = true;

        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(|_| Ok(MailReceipt::Spooled { file_name: "test_email_x.txt".into() }));

        let mut log = MockSubmissionLog::new();
        log.expect_append().withf(|entry| entry.local_test).returning(|_| Ok(()));
        log.expect_location().return_const("contact_log_local.txt".to_string());

        let handler = ContactHandler::new(settings, Arc::new(mailer), Arc::new(allowing_limiter()), Arc::new(log));
        let response = handler.submit(valid_fields(), meta()).await.unwrap();

        assert!(response.message.contains("test_email_x.txt"));
        let info = response.debug_info.unwrap();
        assert_eq!(info.log_file, "contact_log_local.txt");
        assert_eq!(info.ip, "203.0.113.7");
    }

    #[test]
    fn email_body_lists_submission_details() {
        let handler = handler(MockMailer::new(), MockRateLimitStore::new(), MockSubmissionLog::new());
        let submission = ContactSubmission {
            name: "Nikos".into(),
            email: "nikos@example.com".into(),
            phone: String::new(),
            message: "Hello".into(),
        };

        let email = handler.compose_email(&submission, &meta());

        assert_eq!(email.to, "info@akrotopi.gr");
        assert_eq!(email.subject, "Akrotopi Contact Form: New Contact Form Submission");
        assert!(email.body.starts_with("New contact form submission from Akrotopi Apartments website:\n\nName: Nikos\n"));
        assert!(email.body.contains("Phone: Not provided\n"));
        assert!(email.body.contains("Submitted on: 2024-09-14 18:45:00\n"));
        assert!(email.body.contains("IP Address: 203.0.113.7\n"));
        assert!(email.body.contains("User Agent: Mozilla/5.0\n"));
        assert!(email.body.contains("Referrer: Direct access\n"));
        assert!(!email.body.contains("Local Testing"));
    }
}
