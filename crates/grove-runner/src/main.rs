//! Headless runner: loads a configuration, runs the forest until it stops
//! being viable or the step budget runs out, and prints the final head count.

mod reporter;
mod telemetry;

use anyhow::{Context, Result};
use grove_core::SimulationConfig;
use grove_world::Simulation;
use reporter::LogReporter;
use std::path::PathBuf;
use tracing::info;

/// Path of a JSON [`SimulationConfig`]; defaults are used when unset
const CONFIG_ENV: &str = "GROVE_CONFIG";

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = load_config()?;
    info!(
        seed = config.seed,
        depth = config.world.depth,
        width = config.world.width,
        river = config.world.river.enabled,
        max_steps = config.max_steps,
        species = config.species.len(),
        "Starting grove runner"
    );

    let mut simulation = Simulation::new(config).context("invalid simulation config")?;
    info!(
        population = simulation.roster().len(),
        stats = %simulation.stats(),
        "Initial population"
    );

    let mut reporter = LogReporter::default();
    let steps = simulation.run(&mut reporter);

    let stats = simulation.stats();
    info!(
        event = "final_population",
        steps,
        reports = reporter.reports(),
        viable = stats.is_viable(),
        population = stats.total(),
        infected = stats.infected,
        river_cells = stats.river_cells,
        "Run finished after {} steps",
        steps
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

fn load_config() -> Result<SimulationConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = SimulationConfig::from_file(&path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            info!(path = %path.display(), "Loaded configuration");
            Ok(config)
        }
        None => Ok(SimulationConfig::default()),
    }
}
