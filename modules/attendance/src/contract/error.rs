use thiserror::Error;

use crate::contract::model::Action;

/// Errors that are safe to expose to other crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("User not found: {id}")]
    NotFound { id: String },

    #[error("User {id} cannot {action} from the current state")]
    Conflict { id: String, action: Action },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl AttendanceError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn conflict(id: impl Into<String>, action: Action) -> Self {
        Self::Conflict {
            id: id.into(),
            action,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}
