//! Read-only views handed to the outside world after every tick.

use crate::environment::WeatherState;
use crate::world::World;
use grove_core::{Gender, Location, Occupant};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Receives a snapshot once per tick. The snapshot borrows the world, so
/// anything kept past the call has to be copied out.
pub trait Reporter {
    fn report(&mut self, snapshot: &Snapshot<'_>);
}

/// A reporter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _snapshot: &Snapshot<'_>) {}
}

/// What a single occupied cell shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CellContents {
    Agent {
        species: String,
        infected: bool,
        gender: Gender,
    },
    River,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub location: Location,
    pub contents: CellContents,
}

/// State of the simulation after a tick
pub struct Snapshot<'a> {
    pub step: u64,
    /// "Day" or "Night"
    pub time_of_day: &'static str,
    pub weather: WeatherState,
    /// "On" or "Off"
    pub river: &'static str,
    pub viable: bool,
    world: &'a World,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(
        step: u64,
        time_of_day: &'static str,
        weather: WeatherState,
        river: &'static str,
        world: &'a World,
    ) -> Self {
        Self {
            step,
            time_of_day,
            weather,
            river,
            viable: PopulationStats::collect(world).is_viable(),
            world,
        }
    }

    pub fn weather_label(&self) -> &'static str {
        self.weather.label()
    }

    pub fn depth(&self) -> i32 {
        self.world.grid().depth()
    }

    pub fn width(&self) -> i32 {
        self.world.grid().width()
    }

    /// Occupied cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellView> + 'a {
        let world = self.world;
        world.grid().iter().filter_map(move |(location, occupant)| {
            let contents = match occupant {
                Occupant::River => CellContents::River,
                Occupant::Agent(id) => {
                    let agent = world.agent(id)?;
                    CellContents::Agent {
                        species: world.species().name(agent.species).to_string(),
                        infected: agent.infected,
                        gender: agent.gender,
                    }
                }
            };
            Some(CellView { location, contents })
        })
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats::collect(self.world)
    }
}

/// Head counts over the grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulationStats {
    /// Live agents per species name. Species with no members are absent.
    pub species: BTreeMap<String, usize>,
    pub infected: usize,
    pub river_cells: usize,
}

impl PopulationStats {
    pub fn collect(world: &World) -> Self {
        let mut stats = Self::default();
        for (_, occupant) in world.grid().iter() {
            match occupant {
                Occupant::River => stats.river_cells += 1,
                Occupant::Agent(id) => {
                    let Some(agent) = world.agent(id).filter(|a| a.is_alive()) else {
                        continue;
                    };
                    let name = world.species().name(agent.species);
                    *stats.species.entry(name.to_string()).or_default() += 1;
                    if agent.infected {
                        stats.infected += 1;
                    }
                }
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.species.values().sum()
    }

    /// At least two species still alive
    pub fn is_viable(&self) -> bool {
        self.species.len() >= 2
    }
}

impl fmt::Display for PopulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, count) in &self.species {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{name}: {count}")?;
            first = false;
        }
        if first {
            f.write_str("(empty)")?;
        }
        Ok(())
    }
}
