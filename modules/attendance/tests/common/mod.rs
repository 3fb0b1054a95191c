#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use attendance::{
    domain::repo::LogsRepository, infra::storage::InMemoryLogsRepository, Attendance,
    AttendanceConfig, LogEntry,
};

/// Module backed by in-memory storage and initialized with the seed.
pub async fn seeded_memory_module() -> Attendance {
    let module = Attendance::in_memory(AttendanceConfig::default()).unwrap();
    module.init().await.unwrap();
    module
}

/// Module backed by JSON documents under `home`, initialized with the seed.
pub async fn seeded_json_module(home: &Path) -> Attendance {
    let module = Attendance::with_json_storage(AttendanceConfig::default(), home).unwrap();
    module.init().await.unwrap();
    module
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Log repository whose writes always fail; reads come from the wrapped store.
pub struct FailingLogsRepository {
    inner: InMemoryLogsRepository,
}

impl FailingLogsRepository {
    pub fn with_entries(entries: Vec<LogEntry>) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryLogsRepository::with_entries(entries),
        })
    }
}

#[async_trait]
impl LogsRepository for FailingLogsRepository {
    async fn exists(&self) -> anyhow::Result<bool> {
        self.inner.exists().await
    }

    async fn load_all(&self) -> anyhow::Result<Vec<LogEntry>> {
        self.inner.load_all().await
    }

    async fn save_all(&self, _entries: &[LogEntry]) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}
