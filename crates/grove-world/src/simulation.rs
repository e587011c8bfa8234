//! Simulation driver: owns the world, the environment and the roster, and
//! advances them one tick at a time.

use crate::environment::{Activity, Environment};
use crate::river::{river_cells, stamp_river};
use crate::snapshot::{PopulationStats, Reporter, Snapshot};
use crate::world::{AgentSeed, World};
use grove_core::{
    AgentId, DeathCause, Gender, Location, Result, SimulationConfig, SpeciesTable,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

pub struct Simulation {
    world: World,
    environment: Environment,
    /// Live agents in activation order
    roster: Vec<AgentId>,
    species: Arc<SpeciesTable>,
    config: SimulationConfig,
    river: Vec<Location>,
    river_enabled: bool,
    rng: ChaCha8Rng,
    step: u64,
    total_births: u64,
    weather_deaths: u64,
}

impl Simulation {
    /// Build a simulation and populate it
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::unpopulated(config)?;
        sim.reset();
        Ok(sim)
    }

    /// Build a simulation with the river stamped (if enabled) but no agents.
    /// Agents are added with [`Simulation::seed_agent`].
    pub fn unpopulated(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut config = config;
        config.world = config.world.normalized();

        let species = Arc::new(config.species.clone());
        let world = World::new(config.world.depth, config.world.width, Arc::clone(&species));
        let river = river_cells(config.world.depth, config.world.width, &config.world.river);

        let mut sim = Self {
            world,
            environment: Environment::new(config.environment.clone()),
            roster: Vec::new(),
            species,
            river,
            river_enabled: config.world.river.enabled,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            step: 0,
            total_births: 0,
            weather_deaths: 0,
            config,
        };
        sim.stamp_river_if_enabled();
        Ok(sim)
    }

    /// Place an agent and append it to the roster
    pub fn seed_agent(&mut self, seed: AgentSeed) -> AgentId {
        let id = self.world.spawn(seed);
        self.roster.push(id);
        id
    }

    /// Back to step 0: empty grid, day with clear weather, the river
    /// restamped and a fresh population. The random stream carries on.
    pub fn reset(&mut self) {
        self.step = 0;
        self.total_births = 0;
        self.weather_deaths = 0;
        self.roster.clear();
        self.world.clear();
        self.world.set_current_step(0);
        self.environment.reset();
        self.stamp_river_if_enabled();
        self.populate();
    }

    /// Fill the grid row by row. Each free cell tries the species in table
    /// order and gets the first one whose spawn roll succeeds, if any.
    pub fn populate(&mut self) {
        let table = Arc::clone(&self.species);
        let (depth, width) = (self.world.grid().depth(), self.world.grid().width());

        for row in 0..depth {
            for col in 0..width {
                let location = Location::new(row, col);
                if !self.world.grid().is_free(location) {
                    continue;
                }
                for (species_id, config) in table.iter() {
                    if !self.rng.gen_bool(config.spawn_probability) {
                        continue;
                    }
                    let age = if config.max_age > 0 {
                        self.rng.gen_range(0..config.max_age)
                    } else {
                        0
                    };
                    let gender = Gender::from_coin(self.rng.gen_bool(0.5));
                    let mut seed = AgentSeed::newborn(species_id, location, gender).with_age(age);
                    if let Some(diet) = config.role.diet() {
                        let food = if diet.initial_food_level > 0 {
                            self.rng.gen_range(0..diet.initial_food_level)
                        } else {
                            0
                        };
                        seed = seed.with_food_level(food);
                    }
                    if config.initial_infection_probability > 0.0
                        && self.rng.gen_bool(config.initial_infection_probability)
                    {
                        seed = seed.infected();
                    }
                    self.seed_agent(seed);
                    break;
                }
            }
        }
        debug!(
            event = "populated",
            population = self.roster.len(),
            "Grid populated"
        );
    }

    /// Advance by one tick
    pub fn step(&mut self) {
        self.step += 1;
        self.world.set_current_step(self.step);

        if let Some(change) = self.environment.advance(self.step, &mut self.rng) {
            debug!(
                event = "weather_change",
                step = self.step,
                toggled = ?change,
                weather = %self.environment.state(),
                "Weather changed"
            );
        }

        let table = Arc::clone(&self.species);
        let roster = std::mem::take(&mut self.roster);
        let mut next = Vec::with_capacity(roster.len());
        let mut births = Vec::new();

        for id in roster {
            let Some(species_id) = self.world.agent(id).map(|agent| agent.species) else {
                continue;
            };
            let nocturnal = table.get(species_id).nocturnal;

            match self.environment.activity(nocturnal, &mut self.rng) {
                Activity::Idle => {}
                Activity::Act => {
                    if self.world.is_alive(id) {
                        self.world.act(id, &mut self.rng, &mut births);
                    }
                }
                Activity::ActExposed => {
                    if self.world.is_alive(id) {
                        self.world.act(id, &mut self.rng, &mut births);
                    }
                    if self.environment.heat_strikes(&mut self.rng) && self.world.is_alive(id) {
                        self.world.kill(id, DeathCause::Weather);
                        self.weather_deaths += 1;
                    }
                }
            }

            if self.world.is_alive(id) {
                next.push(id);
            }
        }

        // Agents that survived their own turn and newborns can both be
        // eaten by agents later in the roster
        next.retain(|id| self.world.is_alive(*id));
        self.total_births += births.len() as u64;
        next.extend(births.into_iter().filter(|id| self.world.is_alive(*id)));
        self.roster = next;

        let pruned = self.world.prune_dead();
        debug_assert_eq!(self.roster.len(), self.world.live_count());
        if self.step < self.config.world.river.restamp_steps {
            self.stamp_river_if_enabled();
        }

        trace!(
            step = self.step,
            population = self.roster.len(),
            pruned,
            "Tick complete"
        );
    }

    /// Run until `max_steps` ticks have passed or fewer than two species are
    /// left, reporting after every tick. Returns the number of ticks run.
    #[instrument(skip(self, reporter), fields(seed = self.config.seed))]
    pub fn run_until_not_viable(&mut self, max_steps: u64, reporter: &mut dyn Reporter) -> u64 {
        info!(
            population = self.roster.len(),
            "Starting simulation for up to {} steps", max_steps
        );

        let start = self.step;
        while self.step - start < max_steps && self.is_viable() {
            self.step();
            reporter.report(&self.snapshot());

            let interval = self.config.report_interval;
            if interval > 0 && self.step % interval == 0 {
                info!(
                    event = "population_summary",
                    step = self.step,
                    population = self.roster.len(),
                    weather = %self.environment.state(),
                    stats = %self.stats(),
                    "Step {}: {} agents alive",
                    self.step,
                    self.roster.len()
                );
            }
        }

        let ran = self.step - start;
        info!(
            event = "run_complete",
            steps = ran,
            final_step = self.step,
            viable = self.is_viable(),
            population = self.roster.len(),
            total_births = self.total_births,
            weather_deaths = self.weather_deaths,
            stats = %self.stats(),
            "Simulation finished"
        );
        ran
    }

    /// [`Simulation::run_until_not_viable`] with the configured step budget
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> u64 {
        self.run_until_not_viable(self.config.max_steps, reporter)
    }

    /// Whether at least two species still have live members
    pub fn is_viable(&self) -> bool {
        let mut first = None;
        for id in &self.roster {
            let Some(agent) = self.world.agent(*id).filter(|a| a.is_alive()) else {
                continue;
            };
            match first {
                None => first = Some(agent.species),
                Some(species) if species != agent.species => return true,
                Some(_) => {}
            }
        }
        false
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(
            self.step,
            self.environment.clock().label(),
            self.environment.state(),
            self.river_label(),
            &self.world,
        )
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats::collect(&self.world)
    }

    /// Switch river generation on or off. The simulation is reset.
    pub fn set_river_enabled(&mut self, enabled: bool) {
        self.river_enabled = enabled;
        info!(river = self.river_label(), "River toggled, resetting");
        self.reset();
    }

    pub fn river_enabled(&self) -> bool {
        self.river_enabled
    }

    pub fn river_label(&self) -> &'static str {
        if self.river_enabled {
            "On"
        } else {
            "Off"
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn roster(&self) -> &[AgentId] {
        &self.roster
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    pub fn total_births(&self) -> u64 {
        self.total_births
    }

    /// Agents killed by the heat since the last reset
    pub fn weather_deaths(&self) -> u64 {
        self.weather_deaths
    }

    fn stamp_river_if_enabled(&mut self) {
        if self.river_enabled {
            stamp_river(self.world.grid_mut(), &self.river);
        }
    }
}
