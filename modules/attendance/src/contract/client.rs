use async_trait::async_trait;

use crate::contract::model::{Action, LogEntry, TransitionRequest, User};

/// Public API trait for the attendance module that other crates can use
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// All known users in roster order
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;

    /// Get a user by ID
    async fn get_user(&self, id: &str) -> anyhow::Result<User>;

    /// Activity log, most recent first, optionally truncated to `limit` entries
    async fn list_logs(&self, limit: Option<usize>) -> anyhow::Result<Vec<LogEntry>>;

    /// Record an enter or exit for a user and return the updated record
    async fn record(
        &self,
        id: &str,
        action: Action,
        request: TransitionRequest,
    ) -> anyhow::Result<User>;

    /// Restore the built-in seed data
    async fn reset(&self) -> anyhow::Result<()>;
}
