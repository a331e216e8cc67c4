//! RLevator CLI - benchmarks, scripted scenarios and configuration
//!
//! Training happens elsewhere; this binary evaluates policies against the
//! simulated building and reproduces scripted situations for debugging.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unused_async)]
#![allow(clippy::cast_precision_loss)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod settings;

use commands::{benchmark, config, scenario};
use settings::Settings;

#[derive(Parser)]
#[command(name = "rlevator")]
#[command(author, version, about = "RLevator - elevator dispatch simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file (overrides RLEVATOR_CONFIG and the default locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare dispatch policies over several episodes
    Benchmark(benchmark::BenchmarkArgs),

    /// Run a scripted scenario
    #[command(subcommand)]
    Scenario(scenario::ScenarioCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.verbose { "debug" } else { "info" };
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("rlevator={log_level}").into()),
    );
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    match cli.command {
        Commands::Benchmark(args) => {
            let settings = Settings::load(cli.config.as_deref())?;
            benchmark::run(args, settings).await
        }
        Commands::Scenario(cmd) => scenario::run(cmd).await,
        Commands::Config(cmd) => config::run(cmd, cli.config.as_deref()).await,
    }
}
