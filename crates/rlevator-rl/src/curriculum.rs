//! Curriculum scheduling over building size
//!
//! A single scalar success signal (the delivered fraction over the last
//! [`HISTORY_LEN`] episodes) drives growth along two dimensions. Elevators
//! are only added while the floor count has progressed at least as far
//! through its range, so neither dimension races ahead of the other.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::history::{EpisodeOutcome, EpisodeWindow, HISTORY_LEN};

/// Service-ratio threshold per floor-count band: `(max floors, threshold)`
const THRESHOLDS: [(usize, f64); 3] = [(4, 0.7), (6, 0.5), (8, 0.375)];
const THRESHOLD_ABOVE: f64 = 0.3;

/// Active building size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stage {
    pub num_elevators: usize,
    pub num_floors: usize,
}

impl Stage {
    pub fn new(num_elevators: usize, num_floors: usize) -> Self {
        Self {
            num_elevators,
            num_floors,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} elevators x {} floors", self.num_elevators, self.num_floors)
    }
}

/// One step of curriculum growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "dimension")]
pub enum StageChange {
    Elevators { from: usize, to: usize },
    Floors { from: usize, to: usize },
}

/// Curriculum state as a training callback would record it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurriculumSnapshot {
    pub num_elevators: usize,
    pub num_floors: usize,
    pub service_ratio: Option<f64>,
}

/// Service-ratio threshold that must be exceeded at `num_floors`
pub fn threshold_for(num_floors: usize) -> f64 {
    THRESHOLDS
        .iter()
        .find(|(max_floors, _)| num_floors <= *max_floors)
        .map_or(THRESHOLD_ABOVE, |(_, threshold)| *threshold)
}

/// Tracks rolling performance and grows the building when it is good enough
///
/// Stages never shrink: every transition adds exactly one elevator or floor.
#[derive(Debug, Clone)]
pub struct CurriculumScheduler {
    start: Stage,
    max: Stage,
    current: Stage,
    window: EpisodeWindow,
}

impl CurriculumScheduler {
    pub fn new(start: Stage, max: Stage) -> Self {
        debug_assert!(max.num_elevators >= start.num_elevators);
        debug_assert!(max.num_floors >= start.num_floors);
        Self {
            start,
            max,
            current: start,
            window: EpisodeWindow::new(HISTORY_LEN),
        }
    }

    pub fn stage(&self) -> Stage {
        self.current
    }

    pub fn window(&self) -> &EpisodeWindow {
        &self.window
    }

    pub fn is_complete(&self) -> bool {
        self.current == self.max
    }

    pub fn snapshot(&self) -> CurriculumSnapshot {
        CurriculumSnapshot {
            num_elevators: self.current.num_elevators,
            num_floors: self.current.num_floors,
            service_ratio: self.window.service_ratio(),
        }
    }

    /// Record a finished episode and advance if performance allows
    ///
    /// With `override_curriculum` the outcome is still recorded but the
    /// stage is left alone.
    pub fn record_episode(
        &mut self,
        outcome: EpisodeOutcome,
        override_curriculum: bool,
    ) -> Option<StageChange> {
        self.window.push(outcome);

        if override_curriculum || !self.window.is_full() {
            return None;
        }

        let threshold = threshold_for(self.current.num_floors);
        let dropped = self.window.total_dropped() as f64;
        let requested = self.window.total_requested() as f64;
        if dropped > threshold * requested {
            self.advance()
        } else {
            None
        }
    }

    fn advance(&mut self) -> Option<StageChange> {
        let change = if self.current.num_elevators < self.max.num_elevators
            && self.floor_progress() >= self.next_elevator_progress()
        {
            let from = self.current.num_elevators;
            self.current.num_elevators += 1;
            info!(
                "Updating curriculum: num_elevators {} -> {} ({})",
                from, self.current.num_elevators, self.current
            );
            StageChange::Elevators {
                from,
                to: self.current.num_elevators,
            }
        } else if self.current.num_floors < self.max.num_floors {
            let from = self.current.num_floors;
            self.current.num_floors += 1;
            info!(
                "Updating curriculum: num_floors {} -> {} ({})",
                from, self.current.num_floors, self.current
            );
            StageChange::Floors {
                from,
                to: self.current.num_floors,
            }
        } else {
            return None;
        };

        self.window.clear();
        Some(change)
    }

    /// Fraction of the floor range already covered
    fn floor_progress(&self) -> f64 {
        let span = self.max.num_floors - self.start.num_floors;
        if span == 0 {
            return 1.0;
        }
        (self.current.num_floors - self.start.num_floors) as f64 / span as f64
    }

    /// Fraction of the elevator range covered after adding one elevator
    fn next_elevator_progress(&self) -> f64 {
        let span = self.max.num_elevators - self.start.num_elevators;
        (self.current.num_elevators + 1 - self.start.num_elevators) as f64 / span as f64
    }
}
