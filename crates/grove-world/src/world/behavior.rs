//! The per-activation life cycle shared by every species.
//!
//! One activation runs, in order: age, hunger, breeding, then the role's
//! own step (forage and move, roam, or stay put). Any death ends it.

use super::{AgentSeed, World};
use grove_core::{AgentId, DeathCause, Gender, Location, Occupant, Role, SpeciesId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::trace;

impl World {
    /// Run one activation of a live agent, pushing newborns into `births`.
    ///
    /// Panics if the agent is dead: the driver must never activate it.
    pub fn act(&mut self, id: AgentId, rng: &mut ChaCha8Rng, births: &mut Vec<AgentId>) {
        let species_id = match self.agents.get(&id) {
            Some(agent) if agent.is_alive() => agent.species,
            _ => panic!("act called on dead or unknown agent {id}"),
        };
        let table = Arc::clone(&self.species);
        let species = table.get(species_id);

        if !self.grow_older(id, species.max_age) {
            self.kill(id, DeathCause::OldAge);
            return;
        }
        if !self.burn_food(id) {
            self.kill(id, DeathCause::Starvation);
            return;
        }

        self.give_birth(id, species_id, rng, births);

        match &species.role {
            Role::Predator(_) | Role::Grazer(_) => {
                let food = self.forage(id, species_id, rng);
                self.move_or_die(id, food, rng);
            }
            Role::Prey => {
                if species.disease_probability > 0.0 && rng.gen_bool(species.disease_probability) {
                    if let Some(agent) = self.agents.get_mut(&id) {
                        agent.contract_disease(None);
                    }
                    trace!(agent_id = %id, "Agent contracted disease");
                }
                self.move_or_die(id, None, rng);
            }
            Role::Spreader => {}
        }
    }

    /// Number of young this agent produces now: zero unless it is old
    /// enough, has a mate (if its role needs one) and wins the breeding roll.
    pub fn breed(&self, id: AgentId, rng: &mut ChaCha8Rng) -> u32 {
        let Some(agent) = self.agents.get(&id).filter(|a| a.is_alive()) else {
            return 0;
        };
        let species = self.species.get(agent.species);

        let can_breed = agent.age >= species.breeding_age
            && (!species.role.needs_mate() || self.has_mate(id));
        if can_breed && rng.gen_bool(species.breeding_probability) {
            rng.gen_range(1..=species.max_litter_size)
        } else {
            0
        }
    }

    fn grow_older(&mut self, id: AgentId, max_age: u32) -> bool {
        match self.agents.get_mut(&id) {
            Some(agent) => {
                agent.age += 1;
                agent.age <= max_age
            }
            None => false,
        }
    }

    fn burn_food(&mut self, id: AgentId) -> bool {
        match self.agents.get_mut(&id).map(|agent| agent.hunger.as_mut()) {
            Some(Some(hunger)) => hunger.burn(),
            Some(None) => true,
            None => false,
        }
    }

    /// Place a litter into free neighbours, first free cell first
    fn give_birth(
        &mut self,
        id: AgentId,
        species_id: SpeciesId,
        rng: &mut ChaCha8Rng,
        births: &mut Vec<AgentId>,
    ) {
        let Some(here) = self.agents.get(&id).and_then(|a| a.location()) else {
            return;
        };
        let free = self.grid.free_neighbors(here);
        let litter = self.breed(id, rng) as usize;
        if litter == 0 {
            return;
        }

        let disease_probability = self.species.get(species_id).disease_probability;
        let mut born = 0;
        for loc in free.into_iter().take(litter) {
            let gender = Gender::from_coin(rng.gen_bool(0.5));
            let mut seed = AgentSeed::newborn(species_id, loc, gender);
            if disease_probability > 0.0 && rng.gen_bool(disease_probability) {
                seed = seed.infected();
            }
            births.push(self.spawn(seed));
            born += 1;
        }
        trace!(
            parent_id = %id,
            litter = litter,
            born = born,
            "Agent gave birth"
        );
    }

    /// Eat edible live neighbours in scan order. Returns the cell of the
    /// last kill, which becomes the agent's next location.
    fn forage(&mut self, id: AgentId, species_id: SpeciesId, rng: &mut ChaCha8Rng) -> Option<Location> {
        let table = Arc::clone(&self.species);
        let species = table.get(species_id);
        let diet = species.role.diet()?;
        let here = self.agents.get(&id)?.location()?;

        let mut food_location = None;
        for loc in self.grid.neighbors(here) {
            let Some(Occupant::Agent(prey_id)) = self.grid.occupant_at(loc) else {
                continue;
            };
            let Some(prey) = self.agents.get(&prey_id).filter(|p| p.is_alive()) else {
                continue;
            };
            let Some(meal) = table.meal_for(species_id, prey.species) else {
                continue;
            };
            let prey_infected = prey.infected;

            self.kill(prey_id, DeathCause::Eaten);
            food_location = Some(loc);

            let Some(eater) = self.agents.get_mut(&id) else {
                break;
            };
            if let Some(hunger) = eater.hunger.as_mut() {
                hunger.feed(meal.food_value, diet.max_food_level);
            }
            if prey_infected
                && species.disease_probability > 0.0
                && rng.gen_bool(species.disease_probability)
            {
                eater.contract_disease(Some(diet));
                trace!(agent_id = %id, prey_id = %prey_id, "Agent caught disease from prey");
            }

            if meal.ends_meal {
                break;
            }
        }
        food_location
    }

    /// Move onto `target`, or a random free neighbour, or die of overcrowding
    fn move_or_die(&mut self, id: AgentId, target: Option<Location>, rng: &mut ChaCha8Rng) {
        let Some(here) = self.agents.get(&id).and_then(|a| a.location()) else {
            return;
        };
        let destination = target.or_else(|| self.grid.random_free_neighbor(here, rng));
        match destination {
            Some(loc) => self.relocate(id, loc),
            None => self.kill(id, DeathCause::Overcrowding),
        }
    }
}
