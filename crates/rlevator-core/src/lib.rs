//! RLevator Core - Requests, elevators, and shared configuration
//!
//! This crate provides the leaf types of the elevator simulation: the
//! passenger [`Request`], the per-car [`Elevator`] state machine, the
//! construction parameters in [`SimConfig`], and the error taxonomy.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod elevator;
pub mod error;
pub mod types;

pub use config::SimConfig;
pub use elevator::Elevator;
pub use error::{Result, SimError};
pub use types::*;
