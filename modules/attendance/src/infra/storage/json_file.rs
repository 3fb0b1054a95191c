//! JSON-file repositories. Each collection is one pretty-printed array
//! document, rewritten in full on every save.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::contract::model::{LogEntry, User};
use crate::domain::repo::{LogsRepository, UsersRepository};
use crate::infra::storage::entity::{LogRecord, UserRecord};
use crate::infra::storage::mapper;

/// A single JSON array document on disk.
#[derive(Debug, Clone)]
struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn exists(&self) -> Result<bool> {
        tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("Failed to stat {}", self.path.display()))
    }

    /// A missing or blank file reads as an empty array.
    async fn read<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    async fn write<T: Serialize>(&self, items: &[T]) -> Result<()> {
        let payload = serde_json::to_vec_pretty(items)
            .with_context(|| format!("Failed to serialize {}", self.path.display()))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &payload))
            .await
            .context("document writer task failed")?
    }
}

/// Write via a temp file in the target directory, fsync, then rename over.
fn atomic_write(path: &Path, payload: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    temp.write_all(payload).context("Failed to write temp file")?;
    temp.as_file().sync_all().context("Failed to sync temp file")?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to persist {}", path.display()))?;
    Ok(())
}

/// `users.json`
pub struct JsonUsersRepository {
    doc: JsonDocument,
}

impl JsonUsersRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            doc: JsonDocument::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.doc.path
    }
}

#[async_trait]
impl UsersRepository for JsonUsersRepository {
    async fn exists(&self) -> Result<bool> {
        self.doc.exists().await
    }

    async fn load_all(&self) -> Result<Vec<User>> {
        let records: Vec<UserRecord> = self.doc.read().await?;
        Ok(records.into_iter().map(mapper::user_to_contract).collect())
    }

    async fn save_all(&self, users: &[User]) -> Result<()> {
        let records: Vec<UserRecord> = users.iter().map(mapper::user_to_record).collect();
        self.doc.write(&records).await
    }
}

/// `logs.json`
pub struct JsonLogsRepository {
    doc: JsonDocument,
}

impl JsonLogsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            doc: JsonDocument::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.doc.path
    }
}

#[async_trait]
impl LogsRepository for JsonLogsRepository {
    async fn exists(&self) -> Result<bool> {
        self.doc.exists().await
    }

    async fn load_all(&self) -> Result<Vec<LogEntry>> {
        let records: Vec<LogRecord> = self.doc.read().await?;
        Ok(records.into_iter().map(mapper::log_to_contract).collect())
    }

    async fn save_all(&self, entries: &[LogEntry]) -> Result<()> {
        let records: Vec<LogRecord> = entries.iter().map(mapper::log_to_record).collect();
        self.doc.write(&records).await
    }
}
