pub mod activity_log;
pub mod error;
pub mod repo;
pub mod roster;
pub mod seed;
pub mod service;
