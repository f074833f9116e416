//! Population and per-tick statistics.

use crate::{Cell, Species};
use serde::{Deserialize, Serialize};

/// Cell counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub plants: usize,
    pub herbivores: usize,
    pub carnivores: usize,
    pub empty: usize,
}

impl Census {
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut census = Self::default();
        for cell in cells {
            match cell.species() {
                None => census.empty += 1,
                Some(Species::Plant) => census.plants += 1,
                Some(Species::Herbivore) => census.herbivores += 1,
                Some(Species::Carnivore) => census.carnivores += 1,
            }
        }
        census
    }

    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Plant => self.plants,
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
        }
    }

    /// Number of living entities
    pub fn living(&self) -> usize {
        self.plants + self.herbivores + self.carnivores
    }

    pub fn is_extinct(&self) -> bool {
        self.living() == 0
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Ticks since the last initialization, including this one
    pub tick: u64,
    pub births: u32,
    /// Deaths from age or exhausted energy
    pub deaths: u32,
    /// Prey eaten
    pub meals: u32,
    pub moves: u32,
}

impl TickSummary {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }
}
