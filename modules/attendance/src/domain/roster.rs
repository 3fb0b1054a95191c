use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::contract::model::{Action, User};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;

/// Outcome of a successful [`Roster::transition`].
#[derive(Debug, Clone)]
pub struct AppliedTransition {
    /// The user record as persisted after the transition.
    pub user: User,
    /// Time stamped on the user; the matching log entry carries the same value.
    pub stamped_at: DateTime<Utc>,
    /// Collection as it was before the write, for [`Roster::restore`].
    pub previous: Vec<User>,
}

/// Current presence state of every known user.
#[derive(Clone)]
pub struct Roster {
    repo: Arc<dyn UsersRepository>,
}

impl Roster {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, DomainError> {
        self.repo.load_all().await.map_err(DomainError::persistence)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, DomainError> {
        self.get_all()
            .await?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Flip `id` into the state `action` leads to and persist the collection.
    ///
    /// Unknown ids and self-transitions are rejected before anything is
    /// written. `display_name`, when given, replaces the stored name.
    /// Callers must serialize invocations; this is a read-modify-write.
    pub async fn transition(
        &self,
        id: &str,
        action: Action,
        display_name: Option<&str>,
    ) -> Result<AppliedTransition, DomainError> {
        let previous = self.get_all().await?;
        let mut users = previous.clone();

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let target = action.resulting_in_room();
        if user.in_room == target {
            return Err(DomainError::invalid_transition(id, action));
        }

        let stamped_at = now_millis();
        if let Some(name) = display_name {
            user.name = name.to_owned();
        }
        user.in_room = target;
        user.last_update = Some(stamped_at);
        let updated = user.clone();

        self.repo
            .save_all(&users)
            .await
            .map_err(DomainError::persistence)?;

        Ok(AppliedTransition {
            user: updated,
            stamped_at,
            previous,
        })
    }

    /// Write back a previously captured collection, e.g. [`AppliedTransition::previous`].
    pub async fn restore(&self, previous: &[User]) -> Result<(), DomainError> {
        self.replace_all(previous).await
    }

    pub async fn replace_all(&self, users: &[User]) -> Result<(), DomainError> {
        self.repo
            .save_all(users)
            .await
            .map_err(DomainError::persistence)
    }

    pub async fn is_initialized(&self) -> Result<bool, DomainError> {
        self.repo.exists().await.map_err(DomainError::persistence)
    }
}

/// Current time at the millisecond precision the documents store.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::memory::InMemoryUsersRepository;

    fn user(id: &str, in_room: bool) -> User {
        User {
            id: id.to_owned(),
            name: format!("{id} name"),
            in_room,
            last_update: None,
        }
    }

    fn roster(users: Vec<User>) -> Roster {
        Roster::new(Arc::new(InMemoryUsersRepository::with_users(users)))
    }

    #[tokio::test]
    async fn transition_flips_state_and_stamps_time() {
        let roster = roster(vec![user("U001", false), user("U002", true)]);

        let applied = roster
            .transition("U001", Action::Enter, None)
            .await
            .unwrap();

        assert!(applied.user.in_room);
        assert_eq!(applied.user.last_update, Some(applied.stamped_at));
        assert_eq!(applied.previous, vec![user("U001", false), user("U002", true)]);

        let stored = roster.get_by_id("U001").await.unwrap();
        assert_eq!(stored, applied.user);
        // untouched neighbour
        assert_eq!(roster.get_by_id("U002").await.unwrap(), user("U002", true));
    }

    #[tokio::test]
    async fn self_transition_is_rejected_without_writing() {
        let roster = roster(vec![user("U001", true)]);

        let err = roster
            .transition("U001", Action::Enter, Some("renamed"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidTransition { action: Action::Enter, .. }));
        assert_eq!(roster.get_by_id("U001").await.unwrap(), user("U001", true));
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let roster = roster(vec![user("U001", false)]);

        let err = roster
            .transition("U999", Action::Enter, None)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UserNotFound { ref id } if id == "U999"));
        assert_eq!(roster.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn display_name_is_applied_on_success() {
        let roster = roster(vec![user("U001", true)]);

        let applied = roster
            .transition("U001", Action::Exit, Some("Tanaka"))
            .await
            .unwrap();

        assert_eq!(applied.user.name, "Tanaka");
        assert!(!applied.user.in_room);
    }

    #[tokio::test]
    async fn restore_writes_back_the_snapshot() {
        let roster = roster(vec![user("U001", false)]);
        let applied = roster
            .transition("U001", Action::Enter, None)
            .await
            .unwrap();

        roster.restore(&applied.previous).await.unwrap();

        assert_eq!(roster.get_all().await.unwrap(), vec![user("U001", false)]);
    }

    #[test]
    fn now_millis_has_no_sub_millisecond_part() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
