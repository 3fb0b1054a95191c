pub mod entity;
pub mod json_file;
pub mod mapper;
pub mod memory;
pub mod seed;

pub use json_file::{JsonLogsRepository, JsonUsersRepository};
pub use memory::{InMemoryLogsRepository, InMemoryUsersRepository};
pub use seed::builtin_seed;
