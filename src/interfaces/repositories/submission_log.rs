use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::submission::{NewSubmissionEntry, SubmissionEntry},
    errors::StorageError,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubmissionLog: Send + Sync {
    async fn append(&self, entry: &NewSubmissionEntry) -> Result<(), StorageError>;

    /// All entries, newest first.
    async fn read_all(&self) -> Result<Vec<SubmissionEntry>, StorageError>;

    fn location(&self) -> String;
}
