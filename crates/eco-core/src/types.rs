//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one seeded run of the ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationId(pub Uuid);

impl SimulationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SimulationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cell coordinate, addressed as (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Orthogonal neighbors inside a `size`×`size` grid.
    ///
    /// Order is fixed: down, up, right, left. Feeding and the candidate
    /// destination lists both depend on it.
    pub fn orthogonal_neighbors(&self, size: usize) -> impl Iterator<Item = Position> {
        let Position { row, col } = *self;
        let down = (row + 1 < size).then(|| Position::new(row + 1, col));
        let up = (row > 0).then(|| Position::new(row - 1, col));
        let right = (col + 1 < size).then(|| Position::new(row, col + 1));
        let left = (col > 0).then(|| Position::new(row, col - 1));

        [down, up, right, left].into_iter().flatten()
    }
}

/// The three living kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Plant,
    Herbivore,
    Carnivore,
}

impl Species {
    pub fn all() -> [Species; 3] {
        [Species::Plant, Species::Herbivore, Species::Carnivore]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Plant => "plant",
            Species::Herbivore => "herbivore",
            Species::Carnivore => "carnivore",
        };
        f.write_str(name)
    }
}

/// A living occupant of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub species: Species,
    pub energy: i32,
    pub age: i32,
}

impl Entity {
    pub fn new(species: Species, energy: i32) -> Self {
        Self {
            species,
            energy,
            age: 0,
        }
    }

    pub fn plant() -> Self {
        Self::new(Species::Plant, 0)
    }
}

/// One grid cell. Empty carries no energy or age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "CellRecord", try_from = "CellRecord")]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Entity),
}

impl Cell {
    pub fn occupied(species: Species, energy: i32) -> Self {
        Cell::Occupied(Entity::new(species, energy))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn species(&self) -> Option<Species> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(entity) => Some(entity.species),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self.species() {
            None => CellKind::Empty,
            Some(Species::Plant) => CellKind::Plant,
            Some(Species::Herbivore) => CellKind::Herbivore,
            Some(Species::Carnivore) => CellKind::Carnivore,
        }
    }

    pub fn energy(&self) -> i32 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(entity) => entity.energy,
        }
    }

    pub fn age(&self) -> i32 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(entity) => entity.age,
        }
    }
}

/// Wire tag of a cell, rendered as a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    #[serde(rename = " ")]
    Empty,
    #[serde(rename = "P")]
    Plant,
    #[serde(rename = "H")]
    Herbivore,
    #[serde(rename = "C")]
    Carnivore,
}

/// Flat `{type, energy, age}` shape the front-end consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "type")]
    pub kind: CellKind,
    pub energy: i32,
    pub age: i32,
}

impl From<Cell> for CellRecord {
    fn from(cell: Cell) -> Self {
        Self {
            kind: cell.kind(),
            energy: cell.energy(),
            age: cell.age(),
        }
    }
}

impl TryFrom<CellRecord> for Cell {
    type Error = String;

    fn try_from(record: CellRecord) -> std::result::Result<Self, Self::Error> {
        let species = match record.kind {
            CellKind::Empty => {
                if record.energy != 0 || record.age != 0 {
                    return Err(format!(
                        "empty cell carries energy {} and age {}",
                        record.energy, record.age
                    ));
                }
                return Ok(Cell::Empty);
            }
            CellKind::Plant => Species::Plant,
            CellKind::Herbivore => Species::Herbivore,
            CellKind::Carnivore => Species::Carnivore,
        };

        Ok(Cell::Occupied(Entity {
            species,
            energy: record.energy,
            age: record.age,
        }))
    }
}
