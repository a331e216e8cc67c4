//! Scripted scenarios

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use rlevator_core::{Direction, Request, SimConfig, TIME_PER_FLOOR};
use rlevator_rl::{Building, DispatchHeuristic, Policy};

#[derive(Subcommand, Debug)]
pub enum ScenarioCommands {
    /// Car heading down with a passenger while a call waits above it
    GoBack {
        /// Ticks to simulate
        #[arg(short, long, default_value_t = 80)]
        ticks: u64,

        /// Disable the heuristic's direction memory
        #[arg(long)]
        no_memory: bool,
    },
}

pub async fn run(cmd: ScenarioCommands) -> Result<()> {
    match cmd {
        ScenarioCommands::GoBack { ticks, no_memory } => {
            let summary = go_back(ticks, !no_memory)?;
            println!("{summary}");
            Ok(())
        }
    }
}

/// Outcome of a scripted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub ticks: u64,
    pub dropped: u64,
    /// Requests queued at floors; the scripted passenger boards directly
    pub requested: u64,
    pub waiting: usize,
    pub onboard: usize,
}

impl std::fmt::Display for ScenarioSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "After {} ticks: {} delivered, {} waiting, {} onboard",
            self.ticks, self.dropped, self.waiting, self.onboard
        )
    }
}

/// One car on floor 3 of 5 moving down, carrying a passenger to floor 0,
/// with a request waiting at floor 4
pub fn go_back(ticks: u64, direction_memory: bool) -> Result<ScenarioSummary> {
    let config = SimConfig::fixed(1, 5)
        .request_prob(0.0)
        .episode_len(ticks.max(1));
    let mut building = Building::new(config)?;
    building.reset(true);

    let elevator = building
        .elevator_mut(0)
        .context("building has no elevator")?;
    elevator.reposition(3, Direction::MovingDown, TIME_PER_FLOOR);
    elevator.board(Request::new(0, 0));
    building.enqueue_request(4, Request::new(0, 0))?;

    let mut policy = DispatchHeuristic::new(building.layout()).with_direction_memory(direction_memory);
    info!("Running go-back scenario with policy {}", policy.name());

    let mut observation = building.observation();
    for tick in 0..ticks {
        let action = policy.predict(&observation, true)?.action;
        let outcome = building.step(&action)?;
        info!(tick, "{}", building.elevators()[0]);
        observation = outcome.observation;
    }

    Ok(ScenarioSummary {
        ticks,
        dropped: building.num_dropped_off(),
        requested: building.num_total_requests(),
        waiting: building.num_waiting(),
        onboard: building.num_onboard(),
    })
}
