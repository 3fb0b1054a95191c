use std::fmt;

use chrono::{DateTime, Utc};

/// Pure user model for inter-module communication (no serde/schemars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub in_room: bool,
    /// `None` until the user's first transition.
    pub last_update: Option<DateTime<Utc>>,
}

/// Direction of a presence transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Enter,
    Exit,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Enter => "enter",
            Action::Exit => "exit",
        }
    }

    /// `in_room` value a user has after this action.
    pub fn resulting_in_room(self) -> bool {
        matches!(self, Action::Enter)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable row of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub user_id: String,
    pub user_name: String,
    pub action: Action,
    pub timestamp: DateTime<Utc>,
    pub comment: Option<String>,
}

/// Optional data carried by an enter/exit request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionRequest {
    pub user_name: Option<String>,
    pub comment: Option<String>,
}
