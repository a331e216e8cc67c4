//! Policy trait and baseline implementations

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rlevator_core::{Result, SimError};

use crate::observation::{Action, Observation, ObservationLayout};

/// Output of [`Policy::predict`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub action: Action,
}

impl Prediction {
    pub fn new(action: Action) -> Self {
        Self { action }
    }
}

/// Anything that maps observations to target floors
///
/// The dispatch heuristic and learned controllers are interchangeable
/// through this trait.
pub trait Policy: Send {
    /// Policy name
    fn name(&self) -> &str;

    /// Choose one target floor per elevator slot
    fn predict(&mut self, observation: &Observation, deterministic: bool) -> Result<Prediction>;

    /// Called before the first prediction of every episode
    fn on_episode_start(&mut self) {}
}

/// Samples every action entry uniformly from the action space
pub struct RandomPolicy {
    layout: ObservationLayout,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(layout: ObservationLayout, seed: u64) -> Self {
        Self {
            layout,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn predict(&mut self, observation: &Observation, _deterministic: bool) -> Result<Prediction> {
        if observation.len() != self.layout.len() {
            return Err(SimError::Observation(format!(
                "expected {} entries, got {}",
                self.layout.len(),
                observation.len()
            )));
        }

        let action = self
            .layout
            .action_space()
            .into_iter()
            .map(|bound| self.rng.gen_range(0..bound))
            .collect();
        Ok(Prediction::new(action))
    }
}
