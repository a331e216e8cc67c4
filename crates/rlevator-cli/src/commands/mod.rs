//! CLI command modules

pub mod benchmark;
pub mod config;
pub mod scenario;
