use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{
    client::AttendanceApi,
    error::AttendanceError,
    model::{Action, LogEntry, TransitionRequest, User},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the AttendanceApi trait that delegates to the domain service
pub struct AttendanceLocalClient {
    service: Arc<Service>,
}

impl AttendanceLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AttendanceApi for AttendanceLocalClient {
    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.service.list_users().await.map_err(map_domain_error)
    }

    async fn get_user(&self, id: &str) -> anyhow::Result<User> {
        self.service.get_user(id).await.map_err(map_domain_error)
    }

    async fn list_logs(&self, limit: Option<usize>) -> anyhow::Result<Vec<LogEntry>> {
        self.service.list_logs(limit).await.map_err(map_domain_error)
    }

    async fn record(
        &self,
        id: &str,
        action: Action,
        request: TransitionRequest,
    ) -> anyhow::Result<User> {
        self.service
            .record_transition(id, action, request)
            .await
            .map_err(map_domain_error)
    }

    async fn reset(&self) -> anyhow::Result<()> {
        self.service.reset().await.map_err(map_domain_error)
    }
}

/// Map domain errors to contract errors wrapped in anyhow
fn map_domain_error(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::UserNotFound { id } => AttendanceError::not_found(id),
        DomainError::InvalidTransition { id, action } => AttendanceError::conflict(id, action),
        DomainError::Validation { field, message } => {
            AttendanceError::validation(format!("{}: {}", field, message))
        }
        DomainError::Persistence { message } => {
            tracing::error!("attendance storage failure: {}", message);
            AttendanceError::internal()
        }
    };

    anyhow::Error::new(contract_error)
}
