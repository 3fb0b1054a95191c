//! Process-level plumbing shared by the server binary and the modules:
//! layered configuration, home directory resolution, logging and shutdown signals.

pub mod config;
pub mod logging;
pub mod paths;
pub mod shutdown;

pub use config::{AppConfig, LoggingConfig, Overrides, Section, ServerConfig};
pub use paths::{resolve_home_dir, resolve_under};
pub use shutdown::wait_for_shutdown;
