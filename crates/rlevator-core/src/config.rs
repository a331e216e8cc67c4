//! Construction parameters for a simulated building

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::types::DEFAULT_REWARD_PER_SUCCESS;

/// Parameters fixed for the lifetime of a building
///
/// `num_elevators_end` / `num_floors_end` are the curriculum-end sizes and
/// default to the start sizes. With `curriculum` disabled they are ignored
/// and the building stays at its start size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub num_elevators_start: usize,
    pub num_elevators_end: Option<usize>,
    pub num_floors_start: usize,
    pub num_floors_end: Option<usize>,
    pub curriculum: bool,
    pub episode_len: u64,
    pub random_seed: u64,
    pub request_prob: f64,
    pub reward_per_success: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_elevators_start: 1,
            num_elevators_end: None,
            num_floors_start: 3,
            num_floors_end: None,
            curriculum: false,
            episode_len: 200,
            random_seed: 0,
            request_prob: 0.3,
            reward_per_success: DEFAULT_REWARD_PER_SUCCESS,
        }
    }
}

impl SimConfig {
    /// Fixed-size building without a curriculum
    pub fn fixed(num_elevators: usize, num_floors: usize) -> Self {
        Self {
            num_elevators_start: num_elevators,
            num_floors_start: num_floors,
            ..Self::default()
        }
    }

    /// Building that grows from the start sizes to the end sizes
    pub fn with_curriculum(
        num_elevators: (usize, usize),
        num_floors: (usize, usize),
    ) -> Self {
        Self {
            num_elevators_start: num_elevators.0,
            num_elevators_end: Some(num_elevators.1),
            num_floors_start: num_floors.0,
            num_floors_end: Some(num_floors.1),
            curriculum: true,
            ..Self::default()
        }
    }

    pub fn episode_len(mut self, episode_len: u64) -> Self {
        self.episode_len = episode_len;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn request_prob(mut self, request_prob: f64) -> Self {
        self.request_prob = request_prob;
        self
    }

    pub fn reward_per_success(mut self, reward: f64) -> Self {
        self.reward_per_success = reward;
        self
    }

    /// Elevator count the observation and action vectors are sized for
    pub fn num_elevators_max(&self) -> usize {
        if self.curriculum {
            self.num_elevators_end.unwrap_or(self.num_elevators_start)
        } else {
            self.num_elevators_start
        }
    }

    /// Floor count the observation and action vectors are sized for
    pub fn num_floors_max(&self) -> usize {
        if self.curriculum {
            self.num_floors_end.unwrap_or(self.num_floors_start)
        } else {
            self.num_floors_start
        }
    }

    /// Reject parameter combinations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.num_elevators_start == 0 {
            return Err(SimError::Config(
                "num_elevators_start must be at least 1".to_string(),
            ));
        }
        if self.num_floors_start < 2 {
            return Err(SimError::Config(format!(
                "num_floors_start must be at least 2, got {}",
                self.num_floors_start
            )));
        }
        if let Some(end) = self.num_elevators_end {
            if end < self.num_elevators_start {
                return Err(SimError::Config(format!(
                    "num_elevators_end ({end}) is smaller than num_elevators_start ({})",
                    self.num_elevators_start
                )));
            }
        }
        if let Some(end) = self.num_floors_end {
            if end < self.num_floors_start {
                return Err(SimError::Config(format!(
                    "num_floors_end ({end}) is smaller than num_floors_start ({})",
                    self.num_floors_start
                )));
            }
        }
        if self.episode_len == 0 {
            return Err(SimError::Config("episode_len must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.request_prob) {
            return Err(SimError::Config(format!(
                "request_prob must lie in [0, 1], got {}",
                self.request_prob
            )));
        }
        if !self.reward_per_success.is_finite() {
            return Err(SimError::Config(
                "reward_per_success must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
