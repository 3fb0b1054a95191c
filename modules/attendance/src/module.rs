use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;

use crate::api::rest::{openapi, routes};
use crate::config::AttendanceConfig;
use crate::contract::client::AttendanceApi;
use crate::domain::repo::{LogsRepository, UsersRepository};
use crate::domain::seed::SeedData;
use crate::domain::service::{SeedOutcome, Service};
use crate::gateways::local::AttendanceLocalClient;
use crate::infra::storage::{
    builtin_seed, InMemoryLogsRepository, InMemoryUsersRepository, JsonLogsRepository,
    JsonUsersRepository,
};

/// The attendance module: a configured [`Service`] plus its REST surface.
pub struct Attendance {
    config: AttendanceConfig,
    service: Arc<Service>,
}

impl Attendance {
    /// JSON documents under `config.data_dir`, resolved against `home_dir`.
    pub fn with_json_storage(config: AttendanceConfig, home_dir: &Path) -> Result<Self> {
        let users_path = config.users_path(home_dir);
        let logs_path = config.logs_path(home_dir);
        tracing::info!(
            users = %users_path.display(),
            logs = %logs_path.display(),
            "attendance: using JSON storage"
        );

        Self::with_repositories(
            config,
            Arc::new(JsonUsersRepository::new(users_path)),
            Arc::new(JsonLogsRepository::new(logs_path)),
        )
    }

    /// Process-local storage; nothing survives a restart.
    pub fn in_memory(config: AttendanceConfig) -> Result<Self> {
        tracing::info!("attendance: using in-memory storage");
        Self::with_repositories(
            config,
            Arc::new(InMemoryUsersRepository::new()),
            Arc::new(InMemoryLogsRepository::new()),
        )
    }

    pub fn with_repositories(
        config: AttendanceConfig,
        users: Arc<dyn UsersRepository>,
        logs: Arc<dyn LogsRepository>,
    ) -> Result<Self> {
        let seed = builtin_seed()?;
        Ok(Self::with_seed(config, users, logs, seed))
    }

    pub fn with_seed(
        config: AttendanceConfig,
        users: Arc<dyn UsersRepository>,
        logs: Arc<dyn LogsRepository>,
        seed: SeedData,
    ) -> Self {
        let service = Arc::new(Service::new(users, logs, seed, config.service_config()));
        Self { config, service }
    }

    /// Seed missing documents. Call once before serving.
    pub async fn init(&self) -> Result<SeedOutcome> {
        self.service
            .initialize()
            .await
            .context("Failed to initialize attendance data")
    }

    pub fn router(&self) -> Router {
        routes::register_routes(
            Router::new(),
            self.service.clone(),
            self.config.enable_reset,
        )
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        openapi::openapi(self.config.enable_reset)
    }

    pub fn client(&self) -> Arc<dyn AttendanceApi> {
        Arc::new(AttendanceLocalClient::new(self.service.clone()))
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn config(&self) -> &AttendanceConfig {
        &self.config
    }
}
