use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{Action, LogEntry, TransitionRequest, User};
use crate::time_format;

/// REST DTO for a user's presence record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub user_name: String,
    pub is_in_room: bool,
    #[serde(with = "time_format::millis_option")]
    #[schema(value_type = Option<String>, format = DateTime, example = "2025-08-10T07:05:33.719Z")]
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActionDto {
    Enter,
    Exit,
}

/// REST DTO for an activity log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryDto {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub user_name: String,
    pub action: ActionDto,
    #[serde(with = "time_format::millis")]
    #[schema(value_type = String, format = DateTime, example = "2025-08-10T05:30:00.000Z")]
    pub timestamp: DateTime<Utc>,
    pub comment: Option<String>,
}

/// Optional body of `POST /api/users/{user_id}/enter|exit`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransitionReq {
    /// Replaces the stored display name when non-empty.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Stored on the log entry; empty becomes `null`.
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    pub success: bool,
    pub message: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetResponse {
    pub message: String,
}

/// Error payload. Enter/exit failures also carry `success: false`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
}

/// REST DTO for log query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLogsQuery {
    /// Return at most this many of the most recent entries
    pub limit: Option<usize>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.name,
            is_in_room: user.in_room,
            last_update: user.last_update,
        }
    }
}

impl From<Action> for ActionDto {
    fn from(action: Action) -> Self {
        match action {
            Action::Enter => ActionDto::Enter,
            Action::Exit => ActionDto::Exit,
        }
    }
}

impl From<LogEntry> for LogEntryDto {
    fn from(entry: LogEntry) -> Self {
        Self {
            user_id: entry.user_id,
            user_name: entry.user_name,
            action: entry.action.into(),
            timestamp: entry.timestamp,
            comment: entry.comment,
        }
    }
}

impl From<RecordTransitionReq> for TransitionRequest {
    fn from(req: RecordTransitionReq) -> Self {
        Self {
            user_name: req.user_name,
            comment: req.comment,
        }
    }
}
