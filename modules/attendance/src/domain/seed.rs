use crate::contract::model::{LogEntry, User};

/// Documents written on first start and by `reset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub users: Vec<User>,
    pub logs: Vec<LogEntry>,
}
