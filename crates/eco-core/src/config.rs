//! Configuration types for the simulation.

use crate::{Error, Result, Species};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Side length of the square world grid
pub const GRID_SIZE: usize = 15;

/// Starting energy for seeded and newborn animals
pub const INITIAL_ANIMAL_ENERGY: i32 = 100;

/// Parameters of the plant rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantRules {
    /// Age at which the plant dies on its next turn
    pub max_age: i32,
    /// Chance per tick of seeding an empty neighbor
    pub reproduction_probability: f64,
}

pub const PLANT_RULES: PlantRules = PlantRules {
    max_age: 10,
    reproduction_probability: 0.2,
};

/// Parameters of the herbivore and carnivore rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimalRules {
    /// Age at which the animal dies on its next turn
    pub max_age: i32,
    /// Species this animal feeds on
    pub prey: Species,
    /// Chance of eating each adjacent prey
    pub eat_probability: f64,
    /// Energy gained per prey eaten
    pub eat_gain: i32,
    /// Chance per tick of attempting reproduction
    pub reproduction_probability: f64,
    /// Minimum energy required to reproduce
    pub reproduction_threshold: i32,
    /// Energy the parent pays for a birth
    pub reproduction_cost: i32,
    /// Energy the newborn starts with
    pub offspring_energy: i32,
    /// Chance per tick of relocating
    pub move_probability: f64,
    /// Energy paid for relocating
    pub move_cost: i32,
}

pub const HERBIVORE_RULES: AnimalRules = AnimalRules {
    max_age: 50,
    prey: Species::Plant,
    eat_probability: 0.9,
    eat_gain: 30,
    reproduction_probability: 0.075,
    reproduction_threshold: 20,
    reproduction_cost: 10,
    offspring_energy: INITIAL_ANIMAL_ENERGY,
    move_probability: 0.7,
    move_cost: 5,
};

pub const CARNIVORE_RULES: AnimalRules = AnimalRules {
    // Death check fires at 100, not the 80 quoted in older notes.
    max_age: 100,
    prey: Species::Herbivore,
    eat_probability: 1.0,
    eat_gain: 20,
    reproduction_probability: 0.025,
    reproduction_threshold: 20,
    reproduction_cost: 10,
    offspring_energy: INITIAL_ANIMAL_ENERGY,
    move_probability: 0.5,
    move_cost: 5,
};

impl AnimalRules {
    pub fn for_species(species: Species) -> Option<&'static AnimalRules> {
        match species {
            Species::Plant => None,
            Species::Herbivore => Some(&HERBIVORE_RULES),
            Species::Carnivore => Some(&CARNIVORE_RULES),
        }
    }
}

/// Initial population requested by a caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    pub plants: u64,
    pub herbivores: u64,
    pub carnivores: u64,
}

impl Population {
    pub fn new(plants: u64, herbivores: u64, carnivores: u64) -> Self {
        Self {
            plants,
            herbivores,
            carnivores,
        }
    }

    pub fn total(&self) -> u64 {
        self.plants
            .saturating_add(self.herbivores)
            .saturating_add(self.carnivores)
    }

    /// Reject populations that cannot fit on a `size`×`size` grid
    pub fn validate(&self, size: usize) -> Result<()> {
        let capacity = (size * size) as u64;
        let requested = self.total();
        if requested > capacity {
            return Err(Error::TooManyEntities {
                requested,
                capacity,
            });
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Directory holding the front-end page
    pub static_dir: String,
    /// OpenTelemetry endpoint
    pub otel_endpoint: Option<String>,
    /// Fixed RNG seed; fresh entropy when unset
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: "./public".to_string(),
            otel_endpoint: None,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `ECO_*` and `OTEL_EXPORTER_OTLP_ENDPOINT` variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(address) = lookup("ECO_BIND_ADDRESS") {
            config.bind_address = address;
        }
        if let Some(port) = lookup("ECO_PORT") {
            config.port = parse_var("ECO_PORT", &port)?;
        }
        if let Some(dir) = lookup("ECO_STATIC_DIR") {
            config.static_dir = dir;
        }
        if let Some(seed) = lookup("ECO_SEED") {
            config.seed = Some(parse_var("ECO_SEED", &seed)?);
        }
        if let Some(endpoint) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT") {
            config.otel_endpoint = Some(endpoint);
        }

        debug!(?config, "Server configuration loaded");
        Ok(config)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{key} has invalid value {value:?}")))
}
