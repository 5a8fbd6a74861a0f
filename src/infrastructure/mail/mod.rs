pub mod sendmail;
pub mod spool;

use std::sync::Arc;

use crate::{repositories::mailer::Mailer, settings::{AppConfig, MailTransport}};

pub use sendmail::SendmailMailer;
pub use spool::SpoolMailer;

pub fn build_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    match config.mail_transport {
        MailTransport::Sendmail => Arc::new(SendmailMailer::new(config.sendmail_path.clone())),
        MailTransport::Spool => Arc::new(SpoolMailer::new(config.spool_dir.clone())),
    }
}
