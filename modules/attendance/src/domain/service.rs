use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::contract::model::{Action, LogEntry, TransitionRequest, User};
use crate::domain::activity_log::ActivityLog;
use crate::domain::error::DomainError;
use crate::domain::repo::{LogsRepository, UsersRepository};
use crate::domain::roster::Roster;
use crate::domain::seed::SeedData;

/// Limits applied to request fields before any state is touched.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_display_name_length: usize,
    pub max_comment_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_display_name_length: 100,
            max_comment_length: 500,
        }
    }
}

/// Which documents [`Service::initialize`] had to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    pub users_seeded: bool,
    pub logs_seeded: bool,
}

/// Domain service composing the roster and the activity log.
///
/// Every mutation runs under a single writer lock: both documents are
/// rewritten in full, so two unrelated users' transitions would otherwise
/// overwrite each other. Reads go straight to storage.
#[derive(Clone)]
pub struct Service {
    roster: Roster,
    log: ActivityLog,
    seed: Arc<SeedData>,
    config: ServiceConfig,
    writer: Arc<Mutex<()>>,
}

impl Service {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        logs: Arc<dyn LogsRepository>,
        seed: SeedData,
        config: ServiceConfig,
    ) -> Self {
        Self {
            roster: Roster::new(users),
            log: ActivityLog::new(logs),
            seed: Arc::new(seed),
            config,
            writer: Arc::new(Mutex::new(())),
        }
    }

    #[instrument(name = "attendance.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.roster.get_all().await?;
        debug!(count = users.len(), "loaded users");
        Ok(users)
    }

    #[instrument(name = "attendance.service.get_user", skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
        self.roster.get_by_id(id).await
    }

    #[instrument(name = "attendance.service.list_logs", skip(self))]
    pub async fn list_logs(&self, limit: Option<usize>) -> Result<Vec<LogEntry>, DomainError> {
        match limit {
            Some(limit) => self.log.recent(limit).await,
            None => self.log.get_all().await,
        }
    }

    /// Apply an enter/exit for `id` and prepend the matching log entry.
    ///
    /// Rejected transitions leave both documents untouched. If the log write
    /// fails after the user write succeeded, the previous user collection is
    /// written back before the error is returned.
    #[instrument(
        name = "attendance.service.record_transition",
        skip(self, request),
        fields(action = %action)
    )]
    pub async fn record_transition(
        &self,
        id: &str,
        action: Action,
        request: TransitionRequest,
    ) -> Result<User, DomainError> {
        let display_name = non_blank(request.user_name);
        let comment = non_blank(request.comment);
        self.validate(display_name.as_deref(), comment.as_deref())?;

        let _guard = self.writer.lock().await;

        let applied = self
            .roster
            .transition(id, action, display_name.as_deref())
            .await?;

        let entry = LogEntry {
            user_id: applied.user.id.clone(),
            user_name: applied.user.name.clone(),
            action,
            timestamp: applied.stamped_at,
            comment,
        };

        if let Err(e) = self.log.append(entry).await {
            error!(error = %e, "log append failed, restoring previous user state");
            if let Err(rollback) = self.roster.restore(&applied.previous).await {
                error!(error = %rollback, "failed to restore user state");
            }
            return Err(e);
        }

        info!(user_id = %applied.user.id, in_room = applied.user.in_room, "transition recorded");
        Ok(applied.user)
    }

    /// Overwrite both documents with the seed data.
    #[instrument(name = "attendance.service.reset", skip(self))]
    pub async fn reset(&self) -> Result<(), DomainError> {
        let _guard = self.writer.lock().await;

        // an unreadable users document must not block the reset that repairs it
        let previous = match self.roster.get_all().await {
            Ok(users) => Some(users),
            Err(e) => {
                warn!(error = %e, "users document unreadable, resetting without rollback");
                None
            }
        };
        self.roster.replace_all(&self.seed.users).await?;
        if let Err(e) = self.log.replace_all(&self.seed.logs).await {
            if let Some(previous) = previous {
                error!(error = %e, "log reset failed, restoring previous users");
                if let Err(rollback) = self.roster.restore(&previous).await {
                    error!(error = %rollback, "failed to restore user state");
                }
            }
            return Err(e);
        }

        warn!(
            users = self.seed.users.len(),
            logs = self.seed.logs.len(),
            "attendance data reset to seed"
        );
        Ok(())
    }

    /// Seed whichever document does not exist yet; existing ones are kept.
    #[instrument(name = "attendance.service.initialize", skip(self))]
    pub async fn initialize(&self) -> Result<SeedOutcome, DomainError> {
        let _guard = self.writer.lock().await;
        let mut outcome = SeedOutcome::default();

        if !self.roster.is_initialized().await? {
            self.roster.replace_all(&self.seed.users).await?;
            outcome.users_seeded = true;
            info!(count = self.seed.users.len(), "seeded users document");
        }
        if !self.log.is_initialized().await? {
            self.log.replace_all(&self.seed.logs).await?;
            outcome.logs_seeded = true;
            info!(count = self.seed.logs.len(), "seeded logs document");
        }

        Ok(outcome)
    }

    fn validate(&self, display_name: Option<&str>, comment: Option<&str>) -> Result<(), DomainError> {
        if let Some(name) = display_name {
            let len = name.chars().count();
            if len > self.config.max_display_name_length {
                return Err(DomainError::display_name_too_long(
                    len,
                    self.config.max_display_name_length,
                ));
            }
        }
        if let Some(comment) = comment {
            let len = comment.chars().count();
            if len > self.config.max_comment_length {
                return Err(DomainError::comment_too_long(
                    len,
                    self.config.max_comment_length,
                ));
            }
        }
        Ok(())
    }
}

/// `None` for missing and whitespace-only input; anything else is kept as sent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
