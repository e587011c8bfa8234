//! Per-species tuning data.
//!
//! Every organism runs the same life-cycle template; what differs between
//! species is the numbers in [`SpeciesConfig`] and the [`Role`] that picks
//! which branch of the template applies. The [`SpeciesTable`] resolves
//! prey names to [`SpeciesId`]s once, at load time.

use crate::error::{Error, Result};
use crate::types::SpeciesId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of a diet: which species can be eaten and what it is worth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSource {
    /// Name of the prey species
    pub prey: String,
    /// Food level gained by eating one individual
    pub food_value: i32,
    /// Stop scanning for more prey after eating this one
    #[serde(default)]
    pub ends_meal: bool,
}

impl FoodSource {
    pub fn new(prey: &str, food_value: i32) -> Self {
        Self {
            prey: prey.to_string(),
            food_value,
            ends_meal: false,
        }
    }

    pub fn ending_meal(mut self) -> Self {
        self.ends_meal = true;
        self
    }
}

/// Hunger bookkeeping and food table for species that eat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diet {
    pub foods: Vec<FoodSource>,
    /// Food level of a newborn
    pub initial_food_level: i32,
    /// Eating never raises the food level above this
    pub max_food_level: i32,
    /// Food level lost per activation while healthy
    pub hunger_loss: i32,
    /// Food level lost per activation after catching a disease from prey
    pub infected_hunger_loss: i32,
}

/// Which branch of the life-cycle template a species follows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    /// Hunts animal neighbours listed in its diet, then moves onto the kill
    Predator(Diet),
    /// Grazes plant neighbours; same template as a predator
    Grazer(Diet),
    /// Never eats. Roams, breeds, and can catch the disease on its own
    Prey,
    /// Stationary plant that spreads into free neighbours without a mate
    Spreader,
}

impl Role {
    pub fn diet(&self) -> Option<&Diet> {
        match self {
            Role::Predator(diet) | Role::Grazer(diet) => Some(diet),
            Role::Prey | Role::Spreader => None,
        }
    }

    pub fn needs_mate(&self) -> bool {
        !matches!(self, Role::Spreader)
    }
}

/// Tuning constants for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    #[serde(flatten)]
    pub role: Role,
    /// Minimum age for breeding
    pub breeding_age: u32,
    /// Dies on the activation that takes its age past this
    pub max_age: u32,
    /// Chance of a litter on each activation where breeding is possible
    pub breeding_probability: f64,
    /// Largest litter; the actual size is uniform in `1..=max_litter_size`
    pub max_litter_size: u32,
    /// Chance of infection from infected prey, of a newborn starting
    /// infected, and (for prey) of spontaneous infection per activation
    #[serde(default)]
    pub disease_probability: f64,
    /// Acts at night instead of during the day
    #[serde(default)]
    pub nocturnal: bool,
    /// Chance of this species being created in a cell when populating
    #[serde(default)]
    pub spawn_probability: f64,
    /// Chance that an individual created while populating starts infected
    #[serde(default)]
    pub initial_infection_probability: f64,
}

/// A diet entry with the prey name resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meal {
    pub prey: SpeciesId,
    pub food_value: i32,
    pub ends_meal: bool,
}

/// The full set of species in a run, indexed by [`SpeciesId`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<SpeciesConfig>", into = "Vec<SpeciesConfig>")]
pub struct SpeciesTable {
    species: Vec<SpeciesConfig>,
    meals: Vec<Vec<Meal>>,
}

impl SpeciesTable {
    pub fn new(species: Vec<SpeciesConfig>) -> Result<Self> {
        let mut ids = HashMap::new();
        for (index, config) in species.iter().enumerate() {
            validate_species(config)?;
            if ids.insert(config.name.clone(), SpeciesId(index)).is_some() {
                return Err(Error::InvalidConfig(format!(
                    "species '{}' is defined twice",
                    config.name
                )));
            }
        }

        let meals = species
            .iter()
            .map(|config| {
                config
                    .role
                    .diet()
                    .map(|diet| {
                        diet.foods
                            .iter()
                            .map(|food| {
                                let prey = ids
                                    .get(&food.prey)
                                    .copied()
                                    .ok_or_else(|| Error::UnknownSpecies(food.prey.clone()))?;
                                Ok(Meal {
                                    prey,
                                    food_value: food.food_value,
                                    ends_meal: food.ends_meal,
                                })
                            })
                            .collect::<Result<Vec<_>>>()
                    })
                    .unwrap_or_else(|| Ok(Vec::new()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { species, meals })
    }

    /// Look up a species. Ids only come from this table, so a bad id is a bug.
    pub fn get(&self, id: SpeciesId) -> &SpeciesConfig {
        &self.species[id.0]
    }

    pub fn name(&self, id: SpeciesId) -> &str {
        &self.species[id.0].name
    }

    pub fn id_of(&self, name: &str) -> Option<SpeciesId> {
        self.species
            .iter()
            .position(|config| config.name == name)
            .map(SpeciesId)
    }

    /// Resolved diet of `eater`, in declaration order
    pub fn meals(&self, eater: SpeciesId) -> &[Meal] {
        &self.meals[eater.0]
    }

    pub fn meal_for(&self, eater: SpeciesId, prey: SpeciesId) -> Option<&Meal> {
        self.meals(eater).iter().find(|meal| meal.prey == prey)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, &SpeciesConfig)> + '_ {
        self.species
            .iter()
            .enumerate()
            .map(|(index, config)| (SpeciesId(index), config))
    }
}

impl TryFrom<Vec<SpeciesConfig>> for SpeciesTable {
    type Error = Error;

    fn try_from(species: Vec<SpeciesConfig>) -> Result<Self> {
        Self::new(species)
    }
}

impl From<SpeciesTable> for Vec<SpeciesConfig> {
    fn from(table: SpeciesTable) -> Self {
        table.species
    }
}

fn validate_species(config: &SpeciesConfig) -> Result<()> {
    let invalid = |what: &str| {
        Err(Error::InvalidConfig(format!(
            "species '{}': {}",
            config.name, what
        )))
    };

    if config.name.is_empty() {
        return Err(Error::InvalidConfig("species name is empty".to_string()));
    }
    for (label, p) in [
        ("breeding_probability", config.breeding_probability),
        ("disease_probability", config.disease_probability),
        ("spawn_probability", config.spawn_probability),
        ("initial_infection_probability", config.initial_infection_probability),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return invalid(&format!("{label} must be within [0, 1], got {p}"));
        }
    }
    if config.max_litter_size == 0 {
        return invalid("max_litter_size must be at least 1");
    }
    if let Some(diet) = config.role.diet() {
        if diet.max_food_level <= 0 {
            return invalid("max_food_level must be positive");
        }
        if diet.initial_food_level < 0 {
            return invalid("initial_food_level cannot be negative");
        }
        if diet.hunger_loss < 0 || diet.infected_hunger_loss < 0 {
            return invalid("hunger loss cannot be negative");
        }
        if let Some(food) = diet.foods.iter().find(|food| food.food_value < 0) {
            return invalid(&format!("food value for '{}' cannot be negative", food.prey));
        }
        if diet.foods.iter().any(|food| food.prey == config.name) {
            return invalid("a species cannot eat itself");
        }
    }
    Ok(())
}

impl Default for SpeciesTable {
    /// The seven species of the enchanted forest
    fn default() -> Self {
        let species = vec![
            SpeciesConfig {
                name: "Grendle".to_string(),
                role: Role::Predator(Diet {
                    foods: vec![
                        FoodSource::new("Fairy", 25),
                        FoodSource::new("Unicorn", 25),
                        FoodSource::new("Daemon", 20),
                    ],
                    initial_food_level: 56,
                    max_food_level: 70,
                    hunger_loss: 1,
                    infected_hunger_loss: 7,
                }),
                breeding_age: 14,
                max_age: 275,
                breeding_probability: 0.15,
                max_litter_size: 4,
                disease_probability: 0.9,
                nocturnal: true,
                spawn_probability: 0.07,
                initial_infection_probability: 0.0,
            },
            SpeciesConfig {
                name: "Fairy".to_string(),
                role: Role::Prey,
                breeding_age: 1,
                max_age: 40,
                breeding_probability: 0.85,
                max_litter_size: 4,
                disease_probability: 0.1,
                nocturnal: false,
                spawn_probability: 0.18,
                // Fairies carry the disease from the start
                initial_infection_probability: 0.7,
            },
            SpeciesConfig {
                name: "Daemon".to_string(),
                role: Role::Predator(Diet {
                    foods: vec![
                        FoodSource::new("Fairy", 20),
                        FoodSource::new("Faegrass", 12),
                        FoodSource::new("Gnome", 20),
                        FoodSource::new("Grendle", 20),
                    ],
                    initial_food_level: 57,
                    max_food_level: 50,
                    hunger_loss: 1,
                    infected_hunger_loss: 1,
                }),
                breeding_age: 14,
                max_age: 275,
                breeding_probability: 0.03,
                max_litter_size: 4,
                disease_probability: 0.0,
                nocturnal: false,
                spawn_probability: 0.07,
                initial_infection_probability: 0.0,
            },
            SpeciesConfig {
                name: "Faegrass".to_string(),
                role: Role::Spreader,
                breeding_age: 0,
                max_age: 2,
                breeding_probability: 0.4,
                max_litter_size: 100,
                disease_probability: 0.0,
                nocturnal: false,
                spawn_probability: 0.1,
                initial_infection_probability: 0.0,
            },
            SpeciesConfig {
                name: "Unicorn".to_string(),
                role: Role::Grazer(Diet {
                    foods: vec![FoodSource::new("Faegrass", 30)],
                    initial_food_level: 30,
                    max_food_level: 150,
                    hunger_loss: 2,
                    infected_hunger_loss: 2,
                }),
                breeding_age: 10,
                max_age: 500,
                breeding_probability: 0.8,
                max_litter_size: 3,
                disease_probability: 0.0,
                nocturnal: false,
                spawn_probability: 0.18,
                initial_infection_probability: 0.0,
            },
            SpeciesConfig {
                name: "Titan".to_string(),
                role: Role::Predator(Diet {
                    foods: vec![
                        FoodSource::new("Fairy", 15).ending_meal(),
                        FoodSource::new("Grendle", 20),
                        FoodSource::new("Unicorn", 25),
                        FoodSource::new("Gnome", 17),
                        FoodSource::new("Faegrass", 15),
                    ],
                    initial_food_level: 18,
                    max_food_level: 100,
                    hunger_loss: 1,
                    infected_hunger_loss: 3,
                }),
                breeding_age: 10,
                max_age: 300,
                breeding_probability: 0.02,
                max_litter_size: 2,
                disease_probability: 0.8,
                nocturnal: false,
                spawn_probability: 0.05,
                initial_infection_probability: 0.0,
            },
            SpeciesConfig {
                name: "Gnome".to_string(),
                role: Role::Grazer(Diet {
                    foods: vec![FoodSource::new("Faegrass", 20)],
                    initial_food_level: 20,
                    max_food_level: 80,
                    hunger_loss: 1,
                    infected_hunger_loss: 1,
                }),
                breeding_age: 10,
                max_age: 200,
                breeding_probability: 0.25,
                max_litter_size: 6,
                disease_probability: 0.0,
                nocturnal: true,
                spawn_probability: 0.1,
                initial_infection_probability: 0.0,
            },
        ];

        match Self::new(species) {
            Ok(table) => table,
            Err(err) => panic!("built-in species table is invalid: {err}"),
        }
    }
}
