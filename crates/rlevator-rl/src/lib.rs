//! RLevator RL - Building environment and dispatch policies
//!
//! This crate provides the discrete-time building simulation a policy
//! interacts with (step/reset, reward, fixed-width observations), the
//! size curriculum, and the reference scan heuristic.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

pub mod building;
pub mod curriculum;
pub mod dispatch;
pub mod history;
pub mod observation;
pub mod policy;
pub mod runner;

pub use building::{Building, StepInfo, StepOutcome};
pub use curriculum::{CurriculumScheduler, CurriculumSnapshot, Stage, StageChange};
pub use dispatch::DispatchHeuristic;
pub use history::{EpisodeOutcome, EpisodeWindow};
pub use observation::{Action, Observation, ObservationLayout, ObservationView};
pub use policy::{Policy, Prediction, RandomPolicy};
pub use runner::{BenchmarkReport, EpisodeReport, EpisodeRunner};
