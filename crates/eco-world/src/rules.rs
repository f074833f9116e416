//! Per-species update rules applied by the tick engine.
//!
//! Each rule acts on the entity at one position. Cells that receive a
//! newborn or a mover are marked acted so the row-major scan skips them for
//! the rest of the tick.

use crate::dice::{roll, Dice};
use crate::grid::Grid;
use eco_core::{AnimalRules, Cell, Entity, PlantRules, Position, TickSummary};
use tracing::trace;

/// Age the plant, or clear it once it has reached its maximum age, then
/// maybe seed one empty neighbor.
pub fn apply_plant_rule<D: Dice + ?Sized>(
    grid: &mut Grid,
    pos: Position,
    rules: &PlantRules,
    dice: &mut D,
    summary: &mut TickSummary,
) {
    let Cell::Occupied(mut plant) = *grid.get(pos) else {
        return;
    };

    if plant.age >= rules.max_age {
        grid.set(pos, Cell::Empty);
        summary.deaths += 1;
        return;
    }

    plant.age += 1;
    grid.set(pos, Cell::Occupied(plant));

    if roll(dice, rules.reproduction_probability) {
        if let Some(dest) = choose_empty_neighbor(grid, pos, dice) {
            grid.set(dest, Cell::Occupied(Entity::plant()));
            grid.mark_acted(dest);
            summary.births += 1;
        }
    }
}

/// Death check, aging, feeding on adjacent prey, reproduction and movement
/// for a herbivore or carnivore.
///
/// Reproduction and movement are independent draws; a parent that gives
/// birth may still move in the same tick, carrying its reduced energy.
pub fn apply_animal_rule<D: Dice + ?Sized>(
    grid: &mut Grid,
    pos: Position,
    rules: &AnimalRules,
    dice: &mut D,
    summary: &mut TickSummary,
) {
    let Cell::Occupied(mut animal) = *grid.get(pos) else {
        return;
    };

    if animal.age >= rules.max_age || animal.energy <= 0 {
        trace!(
            species = %animal.species,
            row = pos.row,
            col = pos.col,
            age = animal.age,
            energy = animal.energy,
            "Entity died"
        );
        grid.set(pos, Cell::Empty);
        summary.deaths += 1;
        return;
    }

    animal.age += 1;

    for neighbor in pos.orthogonal_neighbors(grid.size()) {
        if grid.get(neighbor).species() == Some(rules.prey) && roll(dice, rules.eat_probability) {
            grid.set(neighbor, Cell::Empty);
            animal.energy += rules.eat_gain;
            summary.meals += 1;
        }
    }

    if roll(dice, rules.reproduction_probability) && animal.energy >= rules.reproduction_threshold {
        if let Some(dest) = choose_empty_neighbor(grid, pos, dice) {
            grid.set(dest, Cell::occupied(animal.species, rules.offspring_energy));
            grid.mark_acted(dest);
            animal.energy -= rules.reproduction_cost;
            summary.births += 1;
        }
    }

    if roll(dice, rules.move_probability) {
        if let Some(dest) = choose_empty_neighbor(grid, pos, dice) {
            animal.energy -= rules.move_cost;
            grid.set(dest, Cell::Occupied(animal));
            grid.set(pos, Cell::Empty);
            grid.mark_acted(dest);
            summary.moves += 1;
            return;
        }
    }

    grid.set(pos, Cell::Occupied(animal));
}

/// Uniformly draw one empty orthogonal neighbor, if there is any
fn choose_empty_neighbor<D: Dice + ?Sized>(
    grid: &Grid,
    pos: Position,
    dice: &mut D,
) -> Option<Position> {
    let candidates = grid.empty_neighbors(pos);
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[dice.pick(candidates.len())])
}
