use std::process::Stdio;

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{
    entities::contact::{MailReceipt, OutgoingEmail},
    errors::MailError,
    repositories::mailer::Mailer,
};

/// Hands messages to the local MTA through a sendmail-compatible binary.
pub struct SendmailMailer {
    program: String,
}

impl SendmailMailer {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait]
impl Mailer for SendmailMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<MailReceipt, MailError> {
        // -t: recipients from headers, -i: a lone "." line does not end input
        let mut child = Command::new(&self.program)
            .arg("-t")
            .arg("-i")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MailError::Spawn(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(email.to_rfc5322().as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("sendmail stderr: {}", stderr.trim());
            return Err(MailError::TransportStatus(output.status.to_string()));
        }

        tracing::debug!("Contact e-mail handed to {}", self.program);
        Ok(MailReceipt::Sent)
    }

    fn transport_name(&self) -> &'static str {
        "sendmail"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "info@akrotopi.gr".into(),
            from: "noreply@akrotopi.gr".into(),
            reply_to: "guest@example.com".into(),
            subject: "Test".into(),
            body: "Hello".into(),
            sent_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[actix_rt::test]
    async fn missing_binary_is_a_spawn_error() {
        let mailer = SendmailMailer::new("/nonexistent/sendmail-for-tests");
        let err = mailer.send(&email()).await.unwrap_err();
        assert!(matches!(err, MailError::Spawn(_)));
    }

    #[actix_rt::test]
    async fn non_zero_exit_is_a_transport_error() {
        let mailer = SendmailMailer::new("false");
        let err = mailer.send(&email()).await.unwrap_err();
        assert!(matches!(err, MailError::TransportStatus(_) | MailError::Io(_)));
    }
}
