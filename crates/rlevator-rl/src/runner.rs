//! Episode runner - drives a policy against a building

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rlevator_core::Result;

use crate::building::Building;
use crate::curriculum::CurriculumSnapshot;
use crate::policy::Policy;

/// Statistics of one finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub reward: f64,
    pub dropped: u64,
    pub requested: u64,
    pub ticks: u64,
    pub curriculum: CurriculumSnapshot,
}

/// Aggregate statistics over several episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub policy: String,
    pub episodes: usize,
    pub total_reward: f64,
    pub mean_reward: f64,
    pub dropped: u64,
    pub requested: u64,
    pub service_ratio: Option<f64>,
}

impl BenchmarkReport {
    fn from_episodes(policy: &str, episodes: &[EpisodeReport]) -> Self {
        let total_reward: f64 = episodes.iter().map(|e| e.reward).sum();
        let dropped = episodes.iter().map(|e| e.dropped).sum();
        let requested: u64 = episodes.iter().map(|e| e.requested).sum();
        Self {
            policy: policy.to_string(),
            episodes: episodes.len(),
            total_reward,
            mean_reward: if episodes.is_empty() {
                0.0
            } else {
                total_reward / episodes.len() as f64
            },
            dropped,
            requested,
            service_ratio: (requested > 0).then(|| dropped as f64 / requested as f64),
        }
    }

    /// Single-line JSON encoding
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Runs whole episodes of a policy
///
/// Benchmarks reset with the curriculum overridden so evaluation never
/// changes the building's stage; training-style runs let it advance.
#[derive(Debug, Clone)]
pub struct EpisodeRunner {
    advance_curriculum: bool,
}

impl EpisodeRunner {
    pub fn new() -> Self {
        Self {
            advance_curriculum: false,
        }
    }

    /// Let episode resets advance the curriculum
    pub fn advance_curriculum(mut self, advance: bool) -> Self {
        self.advance_curriculum = advance;
        self
    }

    /// Reset the building and step the policy until the episode is done
    pub fn run_episode(
        &self,
        building: &mut Building,
        policy: &mut dyn Policy,
    ) -> Result<EpisodeReport> {
        let mut observation = building.reset(!self.advance_curriculum);
        policy.on_episode_start();

        let mut reward = 0.0;
        loop {
            let prediction = policy.predict(&observation, true)?;
            let outcome = building.step(&prediction.action)?;
            reward += outcome.reward;
            if outcome.done {
                break;
            }
            observation = outcome.observation;
        }

        let report = EpisodeReport {
            reward,
            dropped: building.num_dropped_off(),
            requested: building.num_total_requests(),
            ticks: building.t(),
            curriculum: building.curriculum_snapshot(),
        };
        debug!(
            policy = policy.name(),
            reward = report.reward,
            dropped = report.dropped,
            requested = report.requested,
            "episode complete"
        );
        Ok(report)
    }

    /// Run `episodes` episodes and aggregate their statistics
    pub fn benchmark(
        &self,
        building: &mut Building,
        policy: &mut dyn Policy,
        episodes: usize,
    ) -> Result<BenchmarkReport> {
        let reports = (0..episodes)
            .map(|_| self.run_episode(building, policy))
            .collect::<Result<Vec<_>>>()?;

        let report = BenchmarkReport::from_episodes(policy.name(), &reports);
        info!(
            "{}: mean reward {:.2} over {} episodes",
            report.policy, report.mean_reward, report.episodes
        );
        Ok(report)
    }
}

impl Default for EpisodeRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rlevator_core::SimConfig;

    use crate::dispatch::DispatchHeuristic;
    use crate::policy::RandomPolicy;

    fn building(seed: u64) -> Building {
        Building::new(
            SimConfig::fixed(1, 4)
                .episode_len(50)
                .random_seed(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_episode_runs_to_done() {
        let mut building = building(0);
        let mut policy = DispatchHeuristic::new(building.layout());

        let report = EpisodeRunner::new()
            .run_episode(&mut building, &mut policy)
            .unwrap();

        assert_eq!(report.ticks, 51);
        assert!(report.reward <= 0.0);
        assert!(report.dropped <= report.requested);
    }

    #[test]
    fn test_benchmark_aggregates() {
        let mut building = building(3);
        let mut policy = DispatchHeuristic::new(building.layout());

        let report = EpisodeRunner::new()
            .benchmark(&mut building, &mut policy, 4)
            .unwrap();

        assert_eq!(report.policy, "scan");
        assert_eq!(report.episodes, 4);
        assert!((report.mean_reward * 4.0 - report.total_reward).abs() < 1e-9);
        if let Some(ratio) = report.service_ratio {
            assert!((0.0..=1.0).contains(&ratio));
        }
    }

    #[test]
    fn test_report_json_is_single_line() {
        let mut building = building(2);
        let mut policy = RandomPolicy::new(building.layout(), 2);
        let report = EpisodeRunner::new()
            .benchmark(&mut building, &mut policy, 1)
            .unwrap();

        let json = report.to_json().unwrap();
        assert!(!json.contains('\n'));
        let parsed: BenchmarkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.policy, "random");
        assert_eq!(parsed.episodes, 1);
    }

    #[test]
    fn test_empty_benchmark() {
        let report = BenchmarkReport::from_episodes("none", &[]);
        assert_eq!(report.mean_reward, 0.0);
        assert_eq!(report.service_ratio, None);
    }

    #[test]
    fn test_policies_are_interchangeable() {
        let runner = EpisodeRunner::new();
        let mut building = building(1);
        let layout = building.layout();
        let mut policies: Vec<Box<dyn Policy>> = vec![
            Box::new(DispatchHeuristic::new(layout)),
            Box::new(DispatchHeuristic::new(layout).with_direction_memory(false)),
            Box::new(RandomPolicy::new(layout, 1)),
        ];

        for policy in &mut policies {
            let report = runner.benchmark(&mut building, policy.as_mut(), 2).unwrap();
            assert_eq!(report.episodes, 2);
        }
    }

    #[test]
    fn test_benchmark_never_advances_curriculum() {
        let config = SimConfig::with_curriculum((1, 1), (3, 6))
            .episode_len(30)
            .request_prob(0.5);
        let mut building = Building::new(config).unwrap();
        let mut policy = DispatchHeuristic::new(building.layout());

        EpisodeRunner::new()
            .benchmark(&mut building, &mut policy, 25)
            .unwrap();
        assert_eq!(building.num_floors(), 3);
    }
}
