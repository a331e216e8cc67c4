//! Common types used throughout RLevator

use serde::{Deserialize, Serialize};

/// Ticks an elevator spends travelling between two adjacent floors
pub const TIME_PER_FLOOR: u32 = 5;

/// Exclusive upper bound of every count entry in the observation
pub const MAX_PEOPLE: i64 = 50;

/// Reward contributed per tick by every onboard or waiting request
pub const REWARD_PER_TIMESTEP: f64 = -1.0;

/// Default reward per delivered request
pub const DEFAULT_REWARD_PER_SUCCESS: f64 = 0.0;

/// One passenger's pickup event and destination floor
///
/// Two requests issued on the same tick for the same destination compare
/// equal, so storage must keep them as separate list entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    time_requested: u64,
    target_floor: usize,
}

impl Request {
    pub fn new(time_requested: u64, target_floor: usize) -> Self {
        Self {
            time_requested,
            target_floor,
        }
    }

    pub fn time_requested(&self) -> u64 {
        self.time_requested
    }

    pub fn target_floor(&self) -> usize {
        self.target_floor
    }
}

/// Travel direction of an elevator
///
/// The discriminants are the values written into observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    MovingDown = 0,
    #[default]
    Idle = 1,
    MovingUp = 2,
}

impl Direction {
    /// Number of distinct direction values
    pub const COUNT: i64 = 3;

    /// Direction needed to travel from `floor` to `target`
    pub fn toward(floor: usize, target: usize) -> Self {
        match target.cmp(&floor) {
            std::cmp::Ordering::Greater => Direction::MovingUp,
            std::cmp::Ordering::Less => Direction::MovingDown,
            std::cmp::Ordering::Equal => Direction::Idle,
        }
    }

    pub fn as_obs(self) -> i64 {
        self as i64
    }

    pub fn from_obs(value: i64) -> Option<Self> {
        match value {
            0 => Some(Direction::MovingDown),
            1 => Some(Direction::Idle),
            2 => Some(Direction::MovingUp),
            _ => None,
        }
    }

    pub fn is_moving(self) -> bool {
        self != Direction::Idle
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::MovingDown => write!(f, "down"),
            Direction::Idle => write!(f, "idle"),
            Direction::MovingUp => write!(f, "up"),
        }
    }
}
