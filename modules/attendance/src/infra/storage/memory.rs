use async_trait::async_trait;
use parking_lot::Mutex;

use crate::contract::model::{LogEntry, User};
use crate::domain::repo::{LogsRepository, UsersRepository};

/// Process-local user store used by `--mock` and tests.
/// `None` means nothing has been saved yet.
#[derive(Default)]
pub struct InMemoryUsersRepository {
    users: Mutex<Option<Vec<User>>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(Some(users)),
        }
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn exists(&self) -> anyhow::Result<bool> {
        Ok(self.users.lock().is_some())
    }

    async fn load_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.lock().clone().unwrap_or_default())
    }

    async fn save_all(&self, users: &[User]) -> anyhow::Result<()> {
        *self.users.lock() = Some(users.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLogsRepository {
    entries: Mutex<Option<Vec<LogEntry>>>,
}

impl InMemoryLogsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<LogEntry>) -> Self {
        Self {
            entries: Mutex::new(Some(entries)),
        }
    }
}

#[async_trait]
impl LogsRepository for InMemoryLogsRepository {
    async fn exists(&self) -> anyhow::Result<bool> {
        Ok(self.entries.lock().is_some())
    }

    async fn load_all(&self) -> anyhow::Result<Vec<LogEntry>> {
        Ok(self.entries.lock().clone().unwrap_or_default())
    }

    async fn save_all(&self, entries: &[LogEntry]) -> anyhow::Result<()> {
        *self.entries.lock() = Some(entries.to_vec());
        Ok(())
    }
}
