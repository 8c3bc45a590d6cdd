//! Headless vitals simulation
//!
//! Spawns a population, runs it at a fixed step until the duration elapses
//! or everyone has died, and prints a JSON summary.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use vitals_core::config::{default_config_toml, VitalsConfig, DEFAULT_CONFIG_PATH};
use vitals_core::events::EventLogger;
use vitals_core::output::stats::write_stats;
use vitals_core::Simulation;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "vitals_sim")]
#[command(about = "Headless agent vitals simulation")]
struct Args {
    /// Configuration file (defaults apply when it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed for reproducibility (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents to spawn (overrides the config file)
    #[arg(long)]
    agents: Option<usize>,

    /// Simulated seconds to run (overrides the config file)
    #[arg(long)]
    duration: Option<f32>,

    /// Fixed step in seconds (overrides the config file)
    #[arg(long)]
    dt: Option<f32>,

    /// JSONL event log path
    #[arg(long, default_value = "output/events.jsonl")]
    events: PathBuf,

    /// Skip writing the event log
    #[arg(long)]
    no_events: bool,

    /// Also write the summary to this JSON file
    #[arg(long)]
    stats_output: Option<PathBuf>,

    /// Write a default configuration file to --config and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.init_config {
        fs::write(&args.config, default_config_toml())?;
        tracing::info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(agents) = args.agents {
        config.simulation.agents = agents;
    }
    if let Some(duration) = args.duration {
        config.simulation.duration = duration;
    }
    if let Some(dt) = args.dt {
        config.simulation.dt = dt;
    }
    config.validate()?;

    tracing::info!(
        seed = config.simulation.seed,
        agents = config.simulation.agents,
        duration = config.simulation.duration,
        dt = config.simulation.dt,
        "Starting vitals simulation"
    );

    let logger = if args.no_events {
        EventLogger::null()
    } else {
        if let Some(dir) = args.events.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        EventLogger::new(&args.events)?
    };

    let mut simulation = Simulation::new(config, logger)?;
    let stats = simulation.run()?;

    tracing::info!(
        elapsed = stats.elapsed,
        alive = stats.population.alive,
        deaths = stats.deaths.len(),
        events = stats.total_events,
        "Simulation complete"
    );

    if let Some(path) = &args.stats_output {
        write_stats(&stats, path)?;
        tracing::info!(path = %path.display(), "Wrote statistics");
    }

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn load_config(path: &Path) -> vitals_core::Result<VitalsConfig> {
    if path.exists() {
        tracing::info!(path = %path.display(), "Loading configuration");
        VitalsConfig::from_file(path)
    } else {
        tracing::info!(path = %path.display(), "No configuration file, using defaults");
        Ok(VitalsConfig::default())
    }
}
