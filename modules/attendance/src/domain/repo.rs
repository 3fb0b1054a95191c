use async_trait::async_trait;

use crate::contract::model::{LogEntry, User};

/// Storage port for the user collection. Implementations read and write the
/// whole collection at once.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Whether the backing document has been created yet.
    async fn exists(&self) -> anyhow::Result<bool>;

    /// Current collection; empty when the document does not exist.
    async fn load_all(&self) -> anyhow::Result<Vec<User>>;

    /// Replace the stored collection.
    async fn save_all(&self, users: &[User]) -> anyhow::Result<()>;
}

/// Storage port for the activity log, most recent entry first.
#[async_trait]
pub trait LogsRepository: Send + Sync {
    async fn exists(&self) -> anyhow::Result<bool>;

    async fn load_all(&self) -> anyhow::Result<Vec<LogEntry>>;

    async fn save_all(&self, entries: &[LogEntry]) -> anyhow::Result<()>;
}
