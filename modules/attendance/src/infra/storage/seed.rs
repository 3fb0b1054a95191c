use anyhow::{Context, Result};

use crate::domain::seed::SeedData;
use crate::infra::storage::entity::{LogRecord, UserRecord};
use crate::infra::storage::mapper;

const USERS_SEED: &str = include_str!("../../../seed/users.json");
const LOGS_SEED: &str = include_str!("../../../seed/logs.json");

/// Seed documents compiled into the crate.
pub fn builtin_seed() -> Result<SeedData> {
    let users: Vec<UserRecord> =
        serde_json::from_str(USERS_SEED).context("Failed to parse built-in users seed")?;
    let logs: Vec<LogRecord> =
        serde_json::from_str(LOGS_SEED).context("Failed to parse built-in logs seed")?;

    Ok(SeedData {
        users: users.into_iter().map(mapper::user_to_contract).collect(),
        logs: logs.into_iter().map(mapper::log_to_contract).collect(),
    })
}
