use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{entities::contact::{MailReceipt, OutgoingEmail}, errors::MailError};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<MailReceipt, MailError>;

    fn transport_name(&self) -> &'static str;
}
