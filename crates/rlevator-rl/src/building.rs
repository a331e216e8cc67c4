//! Building environment - step/reset contract, reward, request injection

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace};

use rlevator_core::{Elevator, Request, Result, SimConfig, SimError, REWARD_PER_TIMESTEP};

use crate::curriculum::{CurriculumScheduler, CurriculumSnapshot, Stage};
use crate::history::EpisodeOutcome;
use crate::observation::{Observation, ObservationLayout};

/// Extra per-step information; currently carries nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepInfo {}

/// Result of a single [`Building::step`]
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Multi-elevator building simulation
///
/// # Lifecycle
///
/// 1. Construct once per run with [`Building::new`]; the curriculum-end
///    sizes fix the observation and action widths for the building's life.
/// 2. Call [`Building::reset`] to start an episode.
/// 3. Call [`Building::step`] with one target floor per elevator slot until
///    `done`.
///
/// The building owns its random generator; identical seeds and identical
/// action sequences reproduce identical observations, rewards and
/// curriculum transitions.
#[derive(Debug)]
pub struct Building {
    config: SimConfig,
    layout: ObservationLayout,
    curriculum: CurriculumScheduler,
    elevators: Vec<Elevator>,
    waiting: Vec<VecDeque<Request>>,
    t: u64,
    total_t: u64,
    num_total_requests: u64,
    num_dropped_off: u64,
    rng: StdRng,
}

impl Building {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let start = Stage::new(config.num_elevators_start, config.num_floors_start);
        let max = Stage::new(config.num_elevators_max(), config.num_floors_max());
        let layout = ObservationLayout::new(max.num_elevators, max.num_floors);
        let rng = StdRng::seed_from_u64(config.random_seed);

        let mut building = Self {
            config,
            layout,
            curriculum: CurriculumScheduler::new(start, max),
            elevators: Vec::new(),
            waiting: vec![VecDeque::new(); max.num_floors],
            t: 0,
            total_t: 0,
            num_total_requests: 0,
            num_dropped_off: 0,
            rng,
        };
        building.init_state();
        Ok(building)
    }

    fn init_state(&mut self) {
        let stage = self.curriculum.stage();
        self.elevators = (0..stage.num_elevators)
            .map(|_| Elevator::new(stage.num_floors))
            .collect();
        for queue in &mut self.waiting {
            queue.clear();
        }
        self.t = 0;
        self.num_total_requests = 0;
        self.num_dropped_off = 0;
    }

    /// Close the running episode and start a new one
    ///
    /// The finished episode is always added to the curriculum history;
    /// `override_curriculum` only prevents the stage from changing.
    pub fn reset(&mut self, override_curriculum: bool) -> Observation {
        let outcome = EpisodeOutcome::new(self.num_dropped_off, self.num_total_requests);
        debug!(
            dropped = outcome.dropped,
            requested = outcome.requested,
            ticks = self.t,
            "episode finished"
        );

        self.curriculum.record_episode(outcome, override_curriculum);
        self.init_state();
        self.observation()
    }

    /// Advance the simulation by one tick
    ///
    /// `action` holds one target floor per elevator slot, either the full
    /// action width or exactly the active elevator count. Floors outside the
    /// current building are clamped.
    pub fn step(&mut self, action: &[i64]) -> Result<StepOutcome> {
        let active = self.elevators.len();
        if action.len() != self.layout.action_len() && action.len() != active {
            return Err(SimError::ActionShape {
                expected: self.layout.action_len(),
                active,
                actual: action.len(),
            });
        }

        let num_floors = self.num_floors();
        for (index, (elevator, &target)) in self.elevators.iter_mut().zip(action).enumerate() {
            let clamped = target.clamp(0, num_floors as i64 - 1);
            if clamped != target {
                trace!(elevator = index, target, clamped, "clamped out-of-range target floor");
            }
            elevator.set_target(clamped as usize);
        }

        let mut reward = 0.0;
        for elevator in &mut self.elevators {
            elevator.update();

            if elevator.is_idle() {
                let released = elevator.release();
                reward += self.config.reward_per_success * released as f64;
                self.num_dropped_off += released as u64;

                for request in self.waiting[elevator.floor()].drain(..) {
                    elevator.board(request);
                }
            }

            reward += REWARD_PER_TIMESTEP * elevator.onboard_count() as f64;
        }

        reward += REWARD_PER_TIMESTEP * self.num_waiting() as f64;

        self.inject_request();

        self.t += 1;
        self.total_t += 1;

        Ok(StepOutcome {
            observation: self.observation(),
            reward,
            done: self.t > self.config.episode_len,
            info: StepInfo::default(),
        })
    }

    fn inject_request(&mut self) {
        if self.rng.gen::<f64>() >= self.config.request_prob {
            return;
        }

        let num_floors = self.num_floors();
        let origin = self.rng.gen_range(0..num_floors);
        let mut destination = self.rng.gen_range(0..num_floors - 1);
        if destination >= origin {
            destination += 1;
        }

        trace!(t = self.t, origin, destination, "new request");
        self.waiting[origin].push_back(Request::new(self.t, destination));
        self.num_total_requests += 1;
    }

    /// Queue a request at `origin` as if a passenger had just arrived
    ///
    /// Counts toward the episode's issued requests. Used by scripted
    /// scenarios and tests.
    pub fn enqueue_request(&mut self, origin: usize, request: Request) -> Result<()> {
        let num_floors = self.num_floors();
        if origin >= num_floors || request.target_floor() >= num_floors {
            return Err(SimError::InvalidRequest(format!(
                "{origin} -> {} outside a {num_floors}-floor building",
                request.target_floor()
            )));
        }
        self.waiting[origin].push_back(request);
        self.num_total_requests += 1;
        Ok(())
    }

    /// Encode the current state
    pub fn observation(&self) -> Observation {
        let waiting: Vec<usize> = self.waiting[..self.num_floors()]
            .iter()
            .map(VecDeque::len)
            .collect();
        self.layout.encode(self.num_floors(), &self.elevators, &waiting)
    }

    pub fn layout(&self) -> ObservationLayout {
        self.layout
    }

    pub fn observation_space(&self) -> Vec<i64> {
        self.layout.observation_space()
    }

    pub fn action_space(&self) -> Vec<i64> {
        self.layout.action_space()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.curriculum.stage()
    }

    pub fn num_elevators(&self) -> usize {
        self.curriculum.stage().num_elevators
    }

    pub fn num_floors(&self) -> usize {
        self.curriculum.stage().num_floors
    }

    pub fn curriculum(&self) -> &CurriculumScheduler {
        &self.curriculum
    }

    pub fn curriculum_snapshot(&self) -> CurriculumSnapshot {
        self.curriculum.snapshot()
    }

    pub fn elevators(&self) -> &[Elevator] {
        &self.elevators
    }

    /// Mutable access to one car, for scripted scenarios
    pub fn elevator_mut(&mut self, index: usize) -> Option<&mut Elevator> {
        self.elevators.get_mut(index)
    }

    /// Requests waiting at `floor`
    pub fn waiting_at(&self, floor: usize) -> usize {
        self.waiting.get(floor).map_or(0, VecDeque::len)
    }

    /// Requests waiting on every floor
    pub fn num_waiting(&self) -> usize {
        self.waiting.iter().map(VecDeque::len).sum()
    }

    /// Requests riding in every car
    pub fn num_onboard(&self) -> usize {
        self.elevators.iter().map(Elevator::onboard_count).sum()
    }

    /// Episode clock
    pub fn t(&self) -> u64 {
        self.t
    }

    /// Ticks simulated over the building's lifetime
    pub fn total_t(&self) -> u64 {
        self.total_t
    }

    pub fn num_total_requests(&self) -> u64 {
        self.num_total_requests
    }

    pub fn num_dropped_off(&self) -> u64 {
        self.num_dropped_off
    }
}
