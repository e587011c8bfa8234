//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::species::SpeciesTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Grid depth used when the configured one is not positive
pub const DEFAULT_DEPTH: i32 = 300;
/// Grid width used when the configured one is not positive
pub const DEFAULT_WIDTH: i32 = 300;

/// River generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiverConfig {
    /// Whether a river is stamped onto the grid at all
    pub enabled: bool,
    /// Fraction of the width where the river meets the bottom edge
    pub bottom_fraction: f64,
    /// Fraction of the width where the river meets the top edge
    pub top_fraction: f64,
    /// The river is re-stamped on every step before this one
    pub restamp_steps: u64,
    /// The band is one cell wide per this many columns of grid width
    pub band_divisor: i32,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bottom_fraction: 0.4,
            top_fraction: 0.6,
            restamp_steps: 200,
            band_divisor: 25,
        }
    }
}

impl RiverConfig {
    /// Band width in cells for a grid of the given width
    pub fn band_width(&self, grid_width: i32) -> i32 {
        (grid_width / self.band_divisor.max(1)).max(1)
    }
}

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of rows in the grid
    pub depth: i32,
    /// Number of columns in the grid
    pub width: i32,
    pub river: RiverConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            width: DEFAULT_WIDTH,
            river: RiverConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Replace non-positive dimensions with the defaults
    pub fn normalized(mut self) -> Self {
        if self.depth <= 0 || self.width <= 0 {
            warn!(
                depth = self.depth,
                width = self.width,
                "The dimensions must be greater than zero, using default values"
            );
            self.depth = DEFAULT_DEPTH;
            self.width = DEFAULT_WIDTH;
        }
        self
    }
}

/// Day/night and weather parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Chance per step of toggling rain
    pub rain_probability: f64,
    /// Chance per step of toggling snow, rolled only when rain did not toggle
    pub snow_probability: f64,
    /// Chance per step of toggling sun, rolled only when neither rain nor snow toggled
    pub sun_probability: f64,
    /// Chance that an eligible agent acts while it rains
    pub rain_act_chance: f64,
    /// Chance that an eligible agent acts while it snows
    pub snow_act_chance: f64,
    /// Chance that an agent dies after acting in extreme heat
    pub heat_death_chance: f64,
    /// Day and night flip every `day_length` steps
    pub day_length: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            rain_probability: 0.02,
            snow_probability: 0.01,
            sun_probability: 0.75,
            rain_act_chance: 0.7,
            snow_act_chance: 0.4,
            heat_death_chance: 0.01,
            day_length: 2,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Step budget for a full run
    pub max_steps: u64,
    /// Emit a population summary every this many steps
    pub report_interval: u64,
    pub world: WorldConfig,
    pub environment: EnvironmentConfig,
    pub species: SpeciesTable,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_steps: 4000,
            report_interval: 100,
            world: WorldConfig::default(),
            environment: EnvironmentConfig::default(),
            species: SpeciesTable::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the values the species table cannot check on its own.
    /// Grid dimensions are not checked here: see [`WorldConfig::normalized`].
    pub fn validate(&self) -> Result<()> {
        let env = &self.environment;
        for (label, p) in [
            ("rain_probability", env.rain_probability),
            ("snow_probability", env.snow_probability),
            ("sun_probability", env.sun_probability),
            ("rain_act_chance", env.rain_act_chance),
            ("snow_act_chance", env.snow_act_chance),
            ("heat_death_chance", env.heat_death_chance),
            ("river.bottom_fraction", self.world.river.bottom_fraction),
            ("river.top_fraction", self.world.river.top_fraction),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfig(format!(
                    "{label} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.world.river.band_divisor < 1 {
            return Err(Error::InvalidConfig(format!(
                "river.band_divisor must be at least 1, got {}",
                self.world.river.band_divisor
            )));
        }
        if env.day_length == 0 {
            return Err(Error::InvalidConfig(
                "day_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
