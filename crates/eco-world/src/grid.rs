//! Square grid of cells plus the per-tick acted-set.

use crate::dice::Dice;
use eco_core::{Census, Cell, Entity, Error, Position, Result, Species};
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use std::collections::HashSet;

/// A bounded (non-wrapping) square grid.
///
/// Serializes as an array of rows, each an array of cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    acted: HashSet<Position>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            acted: HashSet::new(),
        }
    }

    /// Build a grid from rows; every row must be as long as there are rows
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(Error::Validation(format!(
                    "row {index} has {} cells, expected {size}",
                    row.len()
                )));
            }
            cells.extend(row);
        }

        Ok(Self {
            size,
            cells,
            acted: HashSet::new(),
        })
    }

    /// Discard every cell and start over with `size`×`size` empties
    pub fn reset(&mut self, size: usize) {
        *self = Self::new(size);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, pos: Position) -> &Cell {
        &self.cells[self.pos_to_index(pos)]
    }

    pub fn get_mut(&mut self, pos: Position) -> &mut Cell {
        let index = self.pos_to_index(pos);
        &mut self.cells[index]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        *self.get_mut(pos) = cell;
    }

    /// Drop `count` new entities onto uniformly drawn empty cells.
    ///
    /// Placed cells are not marked acted; they take their first turn on the
    /// next tick.
    pub fn place_random<D: Dice + ?Sized>(
        &mut self,
        species: Species,
        energy: i32,
        count: usize,
        dice: &mut D,
    ) -> Result<()> {
        let available = self.cells.iter().filter(|cell| cell.is_empty()).count();
        if count > available {
            return Err(Error::TooManyEntities {
                requested: count as u64,
                capacity: available as u64,
            });
        }

        for _ in 0..count {
            let pos = loop {
                let candidate = Position::new(dice.pick(self.size), dice.pick(self.size));
                if self.get(candidate).is_empty() {
                    break candidate;
                }
            };
            self.set(pos, Cell::Occupied(Entity::new(species, energy)));
        }

        Ok(())
    }

    pub fn mark_acted(&mut self, pos: Position) {
        self.acted.insert(pos);
    }

    pub fn has_acted(&self, pos: Position) -> bool {
        self.acted.contains(&pos)
    }

    pub fn clear_acted(&mut self) {
        self.acted.clear();
    }

    /// Empty orthogonal neighbors, in down, up, right, left order
    pub fn empty_neighbors(&self, pos: Position) -> Vec<Position> {
        let mut candidates = Vec::with_capacity(4);
        candidates.extend(
            pos.orthogonal_neighbors(self.size)
                .filter(|neighbor| self.get(*neighbor).is_empty()),
        );
        candidates
    }

    pub fn census(&self) -> Census {
        Census::from_cells(&self.cells)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size.max(1))
    }

    /// Iterator over all cells with positions, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        debug_assert!(pos.row < self.size && pos.col < self.size, "{pos:?} outside grid");
        pos.row * self.size + pos.col
    }

    fn index_to_pos(&self, index: usize) -> Position {
        Position::new(index / self.size, index % self.size)
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::scripted::ScriptedDice;
    use eco_core::GRID_SIZE;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(GRID_SIZE);
        assert_eq!(grid.size(), 15);
        assert_eq!(grid.cells.len(), 225);
        assert!(grid.iter().all(|(_, cell)| *cell == Cell::Empty));
        assert_eq!(grid.rows().count(), 15);
    }

    #[test]
    fn test_reset_discards_contents() {
        let mut grid = Grid::new(4);
        grid.set(Position::new(1, 2), Cell::occupied(Species::Herbivore, 40));
        grid.mark_acted(Position::new(1, 2));

        grid.reset(6);
        assert_eq!(grid.size(), 6);
        assert_eq!(grid.census().empty, 36);
        assert!(!grid.has_acted(Position::new(1, 2)));
    }

    #[test]
    fn test_acted_set() {
        let mut grid = Grid::new(3);
        let pos = Position::new(0, 1);
        assert!(!grid.has_acted(pos));

        grid.mark_acted(pos);
        grid.mark_acted(pos);
        assert!(grid.has_acted(pos));
        assert!(!grid.has_acted(Position::new(1, 0)));

        grid.clear_acted();
        assert!(!grid.has_acted(pos));
    }

    #[test]
    fn test_empty_neighbors_skip_occupied() {
        let mut grid = Grid::new(3);
        let center = Position::new(1, 1);
        grid.set(Position::new(2, 1), Cell::Occupied(Entity::plant()));
        grid.set(Position::new(1, 0), Cell::occupied(Species::Carnivore, 100));

        assert_eq!(
            grid.empty_neighbors(center),
            vec![Position::new(0, 1), Position::new(1, 2)]
        );
    }

    #[test]
    fn test_place_random_retries_until_empty() {
        let mut grid = Grid::new(3);
        grid.set(Position::new(0, 0), Cell::Occupied(Entity::plant()));

        // First draw hits the occupied (0, 0), second lands on (2, 1).
        let mut dice = ScriptedDice::new().picks([0, 0, 2, 1]);
        grid.place_random(Species::Herbivore, 100, 1, &mut dice).unwrap();

        assert_eq!(*grid.get(Position::new(2, 1)), Cell::occupied(Species::Herbivore, 100));
        assert!(!grid.has_acted(Position::new(2, 1)));
        assert_eq!(grid.census().herbivores, 1);
    }

    #[test]
    fn test_place_random_refuses_overflow() {
        let mut grid = Grid::new(2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        grid.place_random(Species::Plant, 0, 3, &mut rng).unwrap();

        let err = grid.place_random(Species::Plant, 0, 2, &mut rng).unwrap_err();
        assert!(matches!(err, Error::TooManyEntities { requested: 2, capacity: 1 }));
        assert_eq!(grid.census().plants, 3);
    }

    #[test]
    fn test_grid_serialization_shape() {
        let mut grid = Grid::new(2);
        grid.set(Position::new(0, 1), Cell::Occupied(Entity::plant()));
        grid.set(Position::new(1, 0), Cell::occupied(Species::Carnivore, 100));

        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[[{"type":" ","energy":0,"age":0},{"type":"P","energy":0,"age":0}],"#,
                r#"[{"type":"C","energy":100,"age":0},{"type":" ","energy":0,"age":0}]]"#
            )
        );

        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![Cell::Empty, Cell::Empty], vec![Cell::Empty]];
        assert!(matches!(Grid::from_rows(rows), Err(Error::Validation(_))));

        let json = r#"[[{"type":" ","energy":0,"age":0}],[]]"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
    }

    fn population_within_capacity() -> impl Strategy<Value = (usize, usize, usize)> {
        let capacity = GRID_SIZE * GRID_SIZE;
        (0..=capacity)
            .prop_flat_map(move |plants| (Just(plants), 0..=capacity - plants))
            .prop_flat_map(move |(plants, herbivores)| {
                (Just(plants), Just(herbivores), 0..=capacity - plants - herbivores)
            })
    }

    proptest! {
        #[test]
        fn prop_placement_is_exact(
            (plants, herbivores, carnivores) in population_within_capacity(),
            seed in any::<u64>(),
        ) {
            let mut grid = Grid::new(GRID_SIZE);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            grid.place_random(Species::Plant, 0, plants, &mut rng).unwrap();
            grid.place_random(Species::Herbivore, 100, herbivores, &mut rng).unwrap();
            grid.place_random(Species::Carnivore, 100, carnivores, &mut rng).unwrap();

            let census = grid.census();
            prop_assert_eq!(census.plants, plants);
            prop_assert_eq!(census.herbivores, herbivores);
            prop_assert_eq!(census.carnivores, carnivores);
            prop_assert_eq!(census.empty, 225 - plants - herbivores - carnivores);
            prop_assert!(grid.iter().all(|(_, cell)| cell.age() == 0));
            for (_, cell) in grid.iter() {
                match cell.species() {
                    Some(Species::Plant) | None => {
                        prop_assert_eq!(cell.energy(), 0);
                    }
                    Some(Species::Herbivore | Species::Carnivore) => {
                        prop_assert_eq!(cell.energy(), 100);
                    }
                }
            }
        }
    }
}
