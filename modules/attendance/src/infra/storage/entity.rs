use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_format;

/// One element of `users.json`. Field order matches the document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub user_name: String,
    pub is_in_room: bool,
    #[serde(default, with = "time_format::millis_option")]
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionRecord {
    Enter,
    Exit,
}

/// One element of `logs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub user_name: String,
    pub action: ActionRecord,
    #[serde(with = "time_format::millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
}
