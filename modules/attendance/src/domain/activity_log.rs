use std::sync::Arc;

use crate::contract::model::LogEntry;
use crate::domain::error::DomainError;
use crate::domain::repo::LogsRepository;

/// Prepend-only record of enter/exit events, most recent first.
#[derive(Clone)]
pub struct ActivityLog {
    repo: Arc<dyn LogsRepository>,
}

impl ActivityLog {
    pub fn new(repo: Arc<dyn LogsRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<LogEntry>, DomainError> {
        self.repo.load_all().await.map_err(DomainError::persistence)
    }

    /// The `limit` most recent entries.
    pub async fn recent(&self, limit: usize) -> Result<Vec<LogEntry>, DomainError> {
        let mut entries = self.get_all().await?;
        entries.truncate(limit);
        Ok(entries)
    }

    /// Insert `entry` at the head and persist. The log is not capped.
    pub async fn append(&self, entry: LogEntry) -> Result<(), DomainError> {
        let mut entries = self.get_all().await?;
        entries.insert(0, entry);
        self.replace_all(&entries).await
    }

    pub async fn replace_all(&self, entries: &[LogEntry]) -> Result<(), DomainError> {
        self.repo
            .save_all(entries)
            .await
            .map_err(DomainError::persistence)
    }

    pub async fn is_initialized(&self) -> Result<bool, DomainError> {
        self.repo.exists().await.map_err(DomainError::persistence)
    }
}
