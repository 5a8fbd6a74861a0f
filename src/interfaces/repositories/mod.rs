pub mod mailer;
pub mod rate_limit;
pub mod submission_log;
