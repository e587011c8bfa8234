//! Grid ecosystem engine.
//!
//! Agents of several species live on a bounded grid crossed by a river.
//! Every tick the driver moves the clock and weather forward and lets each
//! agent whose time of day it is age, eat, breed and move.

pub mod agent;
pub mod environment;
pub mod grid;
pub mod river;
pub mod simulation;
pub mod snapshot;
pub mod world;

pub use agent::{Agent, Hunger};
pub use environment::{Activity, Clock, Environment, Weather, WeatherEvent, WeatherState};
pub use grid::Grid;
pub use simulation::Simulation;
pub use snapshot::{CellContents, CellView, NullReporter, PopulationStats, Reporter, Snapshot};
pub use world::{AgentSeed, World};
