//! Agent state.

use grove_core::{AgentId, Diet, Gender, Location, SpeciesId};
use serde::{Deserialize, Serialize};

/// Food bookkeeping for species that eat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunger {
    pub food_level: i32,
    /// Food level lost per activation. Raised for good once diseased.
    pub loss_per_tick: i32,
}

impl Hunger {
    pub fn new(food_level: i32, diet: &Diet) -> Self {
        Self {
            food_level,
            loss_per_tick: diet.hunger_loss,
        }
    }

    /// Lose one activation's worth of food. Returns `false` once starved.
    pub fn burn(&mut self) -> bool {
        self.food_level = self.food_level.saturating_sub(self.loss_per_tick);
        self.food_level > 0
    }

    /// Gain `value`, never rising above `cap`
    pub fn feed(&mut self, value: i32, cap: i32) {
        self.food_level = self.food_level.saturating_add(value).min(cap);
    }
}

/// An organism in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub species: SpeciesId,
    pub gender: Gender,
    pub age: u32,
    pub infected: bool,
    /// `None` for species that never eat
    pub hunger: Option<Hunger>,
    alive: bool,
    location: Option<Location>,
}

impl Agent {
    pub fn new(
        id: AgentId,
        species: SpeciesId,
        location: Location,
        gender: Gender,
        hunger: Option<Hunger>,
    ) -> Self {
        Self {
            id,
            species,
            gender,
            age: 0,
            infected: false,
            hunger,
            alive: true,
            location: Some(location),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current cell. `None` once dead.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn food_level(&self) -> Option<i32> {
        self.hunger.map(|h| h.food_level)
    }

    pub(crate) fn relocate(&mut self, to: Location) {
        debug_assert!(self.alive, "relocating dead agent {}", self.id);
        self.location = Some(to);
    }

    /// Flag the agent dead and drop its location. Returns the cell it held,
    /// or `None` if it was already dead.
    pub(crate) fn mark_dead(&mut self) -> Option<Location> {
        self.alive = false;
        self.location.take()
    }

    /// Catch the disease, paying the diet's infected hunger penalty
    pub fn contract_disease(&mut self, diet: Option<&Diet>) {
        self.infected = true;
        if let (Some(hunger), Some(diet)) = (self.hunger.as_mut(), diet) {
            hunger.loss_per_tick = diet.infected_hunger_loss;
        }
    }
}
