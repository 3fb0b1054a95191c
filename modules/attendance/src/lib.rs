//! Lab attendance: who is in the room, and the log of enter/exit events.
//!
//! `contract` is the stable surface for other crates. The remaining modules
//! are public for wiring and tests.

pub mod contract;

pub mod api;
pub mod config;
pub mod domain;
pub mod gateways;
pub mod infra;
mod module;
mod time_format;

pub use config::AttendanceConfig;
pub use contract::{Action, AttendanceApi, AttendanceError, LogEntry, TransitionRequest, User};
pub use module::Attendance;
