use crate::contract::model::{Action, LogEntry, User};
use crate::infra::storage::entity::{ActionRecord, LogRecord, UserRecord};

pub fn user_to_contract(record: UserRecord) -> User {
    User {
        id: record.user_id,
        name: record.user_name,
        in_room: record.is_in_room,
        last_update: record.last_update,
    }
}

pub fn user_to_record(user: &User) -> UserRecord {
    UserRecord {
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        is_in_room: user.in_room,
        last_update: user.last_update,
    }
}

pub fn log_to_contract(record: LogRecord) -> LogEntry {
    LogEntry {
        user_id: record.user_id,
        user_name: record.user_name,
        action: match record.action {
            ActionRecord::Enter => Action::Enter,
            ActionRecord::Exit => Action::Exit,
        },
        timestamp: record.timestamp,
        comment: record.comment,
    }
}

pub fn log_to_record(entry: &LogEntry) -> LogRecord {
    LogRecord {
        user_id: entry.user_id.clone(),
        user_name: entry.user_name.clone(),
        action: match entry.action {
            Action::Enter => ActionRecord::Enter,
            Action::Exit => ActionRecord::Exit,
        },
        timestamp: entry.timestamp,
        comment: entry.comment.clone(),
    }
}
