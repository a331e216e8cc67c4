//! Error types for RLevator

use thiserror::Error;

/// Main error type for the simulation
///
/// Out-of-range target floors are not represented here: they are clamped
/// where the action is applied so a learning policy keeps receiving feedback.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Actions may cover every elevator slot or only the active cars
    #[error("Action shape error: expected {expected} or {active} entries, got {actual}")]
    ActionShape {
        expected: usize,
        active: usize,
        actual: usize,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Observation error: {0}")]
    Observation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
