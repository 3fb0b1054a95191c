use thiserror::Error;

use crate::contract::model::Action;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("User {id} cannot {action}: already {}", current_state(.action))]
    InvalidTransition { id: String, action: Action },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

fn current_state(attempted: &Action) -> &'static str {
    if attempted.resulting_in_room() {
        "in the room"
    } else {
        "out of the room"
    }
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn invalid_transition(id: impl Into<String>, action: Action) -> Self {
        Self::InvalidTransition {
            id: id.into(),
            action,
        }
    }

    pub fn display_name_too_long(len: usize, max: usize) -> Self {
        Self::validation(
            "userName",
            format!("ユーザー名は{max}文字以内で入力してください（{len}文字）"),
        )
    }

    pub fn comment_too_long(len: usize, max: usize) -> Self {
        Self::validation(
            "comment",
            format!("コメントは{max}文字以内で入力してください（{len}文字）"),
        )
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wraps a storage failure; the full cause chain goes into the message.
    pub fn persistence(err: anyhow::Error) -> Self {
        Self::Persistence {
            message: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_the_current_state() {
        let err = DomainError::invalid_transition("U001", Action::Enter);
        assert_eq!(err.to_string(), "User U001 cannot enter: already in the room");

        let err = DomainError::invalid_transition("U001", Action::Exit);
        assert_eq!(
            err.to_string(),
            "User U001 cannot exit: already out of the room"
        );
    }

    #[test]
    fn persistence_keeps_the_cause_chain() {
        let inner = anyhow::anyhow!("disk full").context("writing users.json");
        let err = DomainError::persistence(inner);
        assert_eq!(
            err.to_string(),
            "Persistence error: writing users.json: disk full"
        );
    }
}
