use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::{fs::{self, OpenOptions}, io::AsyncWriteExt, sync::Mutex};

use crate::{
    entities::submission::{NewSubmissionEntry, SubmissionEntry},
    errors::StorageError,
    repositories::submission_log::SubmissionLog,
};

/// Plain-text log with one line per submission, only ever appended to.
pub struct FileSubmissionLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl FileSubmissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SubmissionLog for FileSubmissionLog {
    async fn append(&self, entry: &NewSubmissionEntry) -> Result<(), StorageError> {
        let mut line = entry.to_log_line();
        line.push('\n');

        let _guard = self.writer.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        file.flush().await.map_err(|e| StorageError::io(&self.path, e))
    }

    async fn read_all(&self) -> Result<Vec<SubmissionEntry>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        Ok(content
            .lines()
            .rev()
            .filter(|line| !line.trim().is_empty())
            .map(SubmissionEntry::parse)
            .collect())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
