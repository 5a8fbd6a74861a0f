use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::{
    entities::contact::{MailReceipt, OutgoingEmail},
    errors::MailError,
    repositories::mailer::Mailer,
};

/// Writes each message to a text file instead of sending it. Used for local testing.
pub struct SpoolMailer {
    dir: PathBuf,
}

impl SpoolMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_name(email: &OutgoingEmail) -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!(
            "test_email_{}_{}.txt",
            email.sent_at.format("%Y-%m-%d_%H-%M-%S"),
            &id[..8]
        )
    }
}

#[async_trait]
impl Mailer for SpoolMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<MailReceipt, MailError> {
        fs::create_dir_all(&self.dir).await?;

        let file_name = Self::file_name(email);
        let content = format!(
            "To: {}\nFrom: {}\nReply-To: {}\nSubject: {}\n\n{}",
            email.to, email.from, email.reply_to, email.subject, email.body
        );
        fs::write(self.dir.join(&file_name), content).await?;

        tracing::info!("Contact e-mail spooled to {}", self.dir.join(&file_name).display());
        Ok(MailReceipt::Spooled { file_name })
    }

    fn transport_name(&self) -> &'static str {
        "spool"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[actix_rt::test]
    async fn spools_message_with_headers() {
        let dir = tempdir().unwrap();
        let mailer = SpoolMailer::new(dir.path().join("spool"));
        let email = OutgoingEmail {
            to: "test@localhost.com".into(),
            from: "noreply@localhost.com".into(),
            reply_to: "guest@example.com".into(),
            subject: "[LOCAL TEST] Hello".into(),
            body: "Body text".into(),
            sent_at: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(7, 8, 9).unwrap(),
        };

        let MailReceipt::Spooled { file_name } = mailer.send(&email).await.unwrap() else {
            panic!("spool transport must report a spooled file");
        };
        assert!(file_name.starts_with("test_email_2024-05-06_07-08-09_"));

        let content = std::fs::read_to_string(dir.path().join("spool").join(&file_name)).unwrap();
        assert!(content.starts_with("To: test@localhost.com\nFrom: noreply@localhost.com\n"));
        assert!(content.ends_with("\n\nBody text"));
    }
}
