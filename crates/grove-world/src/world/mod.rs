//! The populated grid: cell occupancy plus the agents that live in it.

mod behavior;

use crate::agent::{Agent, Hunger};
use crate::grid::Grid;
use grove_core::{AgentId, DeathCause, Gender, Location, Occupant, SpeciesId, SpeciesTable};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Everything needed to put an agent on the grid
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSeed {
    pub species: SpeciesId,
    pub location: Location,
    pub gender: Gender,
    pub age: u32,
    /// `None` starts eaters at their diet's initial food level
    pub food_level: Option<i32>,
    pub infected: bool,
}

impl AgentSeed {
    /// A healthy age-zero agent
    pub fn newborn(species: SpeciesId, location: Location, gender: Gender) -> Self {
        Self {
            species,
            location,
            gender,
            age: 0,
            food_level: None,
            infected: false,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_food_level(mut self, food_level: i32) -> Self {
        self.food_level = Some(food_level);
        self
    }

    pub fn infected(mut self) -> Self {
        self.infected = true;
        self
    }
}

/// Grid plus agent records.
///
/// Dead agents keep their record until [`World::prune_dead`] so that ids
/// still held by the roster resolve during the rest of the tick.
pub struct World {
    grid: Grid,
    agents: HashMap<AgentId, Agent>,
    species: Arc<SpeciesTable>,
    next_id: u64,
    current_step: u64,
}

impl World {
    pub fn new(depth: i32, width: i32, species: Arc<SpeciesTable>) -> Self {
        Self {
            grid: Grid::new(depth, width),
            agents: HashMap::new(),
            species,
            next_id: 0,
            current_step: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.agents.get(&id).is_some_and(Agent::is_alive)
    }

    /// The live agent standing at `loc`, if any
    pub fn agent_at(&self, loc: Location) -> Option<&Agent> {
        self.grid
            .occupant_at(loc)
            .and_then(Occupant::agent)
            .and_then(|id| self.agents.get(&id))
            .filter(|agent| agent.is_alive())
    }

    pub(crate) fn set_current_step(&mut self, step: u64) {
        self.current_step = step;
    }

    /// Create an agent and put it on the grid. The target cell must be empty.
    pub fn spawn(&mut self, seed: AgentSeed) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;

        let config = self.species.get(seed.species);
        let hunger = config.role.diet().map(|diet| {
            Hunger::new(seed.food_level.unwrap_or(diet.initial_food_level), diet)
        });

        let mut agent = Agent::new(
            id,
            seed.species,
            seed.location,
            seed.gender,
            hunger,
        );
        agent.age = seed.age;
        agent.infected = seed.infected;

        self.grid.place(Occupant::Agent(id), seed.location);
        self.agents.insert(id, agent);
        trace!(
            agent_id = %id,
            species = self.species.name(seed.species),
            location = %seed.location,
            "Agent spawned"
        );
        id
    }

    /// Kill an agent and free its cell. Killing a dead agent does nothing.
    pub fn kill(&mut self, id: AgentId, cause: DeathCause) {
        let Some(agent) = self.agents.get_mut(&id) else {
            return;
        };
        if let Some(loc) = agent.mark_dead() {
            self.grid.clear(loc);
            debug!(
                event = "agent_death",
                agent_id = %id,
                species = self.species.name(agent.species),
                age = agent.age,
                cause = %cause,
                tick = self.current_step,
                "Agent died"
            );
        }
    }

    /// Move a live agent into an empty cell
    pub(crate) fn relocate(&mut self, id: AgentId, to: Location) {
        let agent = self
            .agents
            .get_mut(&id)
            .filter(|agent| agent.is_alive())
            .unwrap_or_else(|| panic!("cannot move dead or unknown agent {id}"));
        if let Some(from) = agent.location() {
            if from == to {
                return;
            }
            self.grid.clear(from);
        }
        agent.relocate(to);
        self.grid.place(Occupant::Agent(id), to);
    }

    /// True if a neighbour is a live agent of the same species and the other sex
    pub fn has_mate(&self, id: AgentId) -> bool {
        let Some(agent) = self.agents.get(&id) else {
            return false;
        };
        let Some(here) = agent.location() else {
            return false;
        };
        self.grid.neighbors(here).into_iter().any(|loc| {
            self.agent_at(loc).is_some_and(|other| {
                other.species == agent.species && other.gender != agent.gender
            })
        })
    }

    /// Drop the records of dead agents. Returns how many were removed.
    pub fn prune_dead(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(|_, agent| agent.is_alive());
        before - self.agents.len()
    }

    /// Remove every agent and obstacle
    pub fn clear(&mut self) {
        self.grid.clear_all();
        self.agents.clear();
    }

    pub fn live_count(&self) -> usize {
        self.agents.values().filter(|agent| agent.is_alive()).count()
    }
}
