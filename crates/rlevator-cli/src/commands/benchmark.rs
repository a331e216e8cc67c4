//! Policy benchmarks
//!
//! Every policy runs on its own building inside a blocking task, so
//! policies are measured concurrently with no shared state.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use rlevator_core::SimConfig;
use rlevator_rl::{
    BenchmarkReport, Building, DispatchHeuristic, EpisodeRunner, ObservationLayout, Policy,
    RandomPolicy,
};

use crate::settings::Settings;

/// Policy names understood by `--policies`
pub const POLICIES: [&str; 3] = ["scan", "scan_no_memory", "random"];

#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// Episodes per policy
    #[arg(short, long)]
    pub episodes: Option<usize>,

    /// Comma-separated policies (scan, scan_no_memory, random)
    #[arg(short, long, value_delimiter = ',')]
    pub policies: Vec<String>,

    /// Base seed; policy `i` uses `seed + i`
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print one JSON report per line
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON reports to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn make_policy(name: &str, layout: ObservationLayout, seed: u64) -> Result<Box<dyn Policy>> {
    let policy: Box<dyn Policy> = match name {
        "scan" => Box::new(DispatchHeuristic::new(layout)),
        "scan_no_memory" => Box::new(DispatchHeuristic::new(layout).with_direction_memory(false)),
        "random" => Box::new(RandomPolicy::new(layout, seed)),
        other => bail!("unknown policy '{other}', expected one of {POLICIES:?}"),
    };
    Ok(policy)
}

fn run_policy(name: &str, config: SimConfig, episodes: usize) -> Result<BenchmarkReport> {
    let seed = config.random_seed;
    let mut building = Building::new(config)?;
    let mut policy = make_policy(name, building.layout(), seed)?;
    let report = EpisodeRunner::new().benchmark(&mut building, policy.as_mut(), episodes)?;
    Ok(report)
}

pub async fn run(args: BenchmarkArgs, settings: Settings) -> Result<()> {
    let episodes = args.episodes.unwrap_or(settings.benchmark.episodes);
    let policies = if args.policies.is_empty() {
        settings.benchmark.policies.clone()
    } else {
        args.policies.clone()
    };
    if let Some(unknown) = policies.iter().find(|name| !POLICIES.contains(&name.as_str())) {
        bail!("unknown policy '{unknown}', expected one of {POLICIES:?}");
    }

    let base_seed = args.seed.unwrap_or(settings.simulation.random_seed);
    info!(
        "Benchmarking {} policies for {} episodes each",
        policies.len(),
        episodes
    );

    let handles: Vec<_> = policies
        .into_iter()
        .zip(0_u64..)
        .map(|(name, offset)| {
            let config = settings
                .simulation
                .clone()
                .random_seed(base_seed.wrapping_add(offset));
            tokio::task::spawn_blocking(move || run_policy(&name, config, episodes))
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await.context("benchmark task failed")??);
    }

    if args.json {
        for report in &reports {
            println!("{}", report.to_json()?);
        }
    } else {
        print_table(&reports);
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Reports written to {}", path.display());
    }

    Ok(())
}

fn print_table(reports: &[BenchmarkReport]) {
    println!(
        "{:<16} {:>8} {:>14} {:>10} {:>10} {:>9}",
        "POLICY", "EPISODES", "MEAN REWARD", "DROPPED", "REQUESTED", "SERVICE"
    );
    println!("{}", "-".repeat(72));
    for report in reports {
        let service = report
            .service_ratio
            .map_or_else(|| "-".to_string(), |ratio| format!("{:.1}%", ratio * 100.0));
        println!(
            "{:<16} {:>8} {:>14.2} {:>10} {:>10} {:>9}",
            report.policy,
            report.episodes,
            report.mean_reward,
            report.dropped,
            report.requested,
            service
        );
    }
}
