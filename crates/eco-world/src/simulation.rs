//! Tick engine driving the whole grid.

use crate::dice::Dice;
use crate::grid::Grid;
use crate::rules::{apply_animal_rule, apply_plant_rule};
use chrono::{DateTime, Utc};
use eco_core::{
    Census, Cell, Error, Population, Position, Result, SimulationId, Species, TickSummary,
    CARNIVORE_RULES, GRID_SIZE, HERBIVORE_RULES, INITIAL_ANIMAL_ENERGY, PLANT_RULES,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, event, info, instrument, warn, Level};

/// Owns the grid and the random source; the only mutator of either.
pub struct Simulation<D: Dice = ChaCha8Rng> {
    id: SimulationId,
    started_at: DateTime<Utc>,
    grid: Grid,
    dice: D,
    tick: u64,
    last_summary: Option<TickSummary>,
}

impl Simulation<ChaCha8Rng> {
    /// Reproducible simulation; the same seed yields the same runs
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<D: Dice> Simulation<D> {
    /// Start with an all-empty grid of the standard size
    pub fn new(dice: D) -> Self {
        Self::with_grid(Grid::new(GRID_SIZE), dice)
    }

    pub fn with_grid(grid: Grid, dice: D) -> Self {
        Self {
            id: SimulationId::new(),
            started_at: Utc::now(),
            grid,
            dice,
            tick: 0,
            last_summary: None,
        }
    }

    /// Replace the grid with a freshly seeded population.
    ///
    /// Populations larger than the grid are rejected before anything is
    /// touched, so a failed call leaves the current run intact.
    #[instrument(skip(self), fields(previous_id = %self.id))]
    pub fn initialize(&mut self, population: Population) -> Result<&Grid> {
        if let Err(err) = population.validate(GRID_SIZE) {
            warn!(error = %err, "Rejected initial population");
            return Err(err);
        }

        let mut grid = Grid::new(GRID_SIZE);
        grid.place_random(Species::Plant, 0, placement_count(population.plants)?, &mut self.dice)?;
        grid.place_random(
            Species::Herbivore,
            INITIAL_ANIMAL_ENERGY,
            placement_count(population.herbivores)?,
            &mut self.dice,
        )?;
        grid.place_random(
            Species::Carnivore,
            INITIAL_ANIMAL_ENERGY,
            placement_count(population.carnivores)?,
            &mut self.dice,
        )?;

        self.grid = grid;
        self.id = SimulationId::new();
        self.started_at = Utc::now();
        self.tick = 0;
        self.last_summary = None;

        info!(
            simulation_id = %self.id,
            plants = population.plants,
            herbivores = population.herbivores,
            carnivores = population.carnivores,
            "Simulation initialized"
        );

        Ok(&self.grid)
    }

    /// Run one full row-major pass over the grid
    #[instrument(skip(self), fields(simulation_id = %self.id, tick = self.tick + 1))]
    pub fn advance_tick(&mut self) -> &Grid {
        self.tick += 1;
        let mut summary = TickSummary::new(self.tick);

        self.grid.clear_acted();

        let size = self.grid.size();
        for row in 0..size {
            for col in 0..size {
                let pos = Position::new(row, col);
                if self.grid.has_acted(pos) {
                    continue;
                }

                let Cell::Occupied(entity) = *self.grid.get(pos) else {
                    continue;
                };

                match entity.species {
                    Species::Plant => apply_plant_rule(
                        &mut self.grid,
                        pos,
                        &PLANT_RULES,
                        &mut self.dice,
                        &mut summary,
                    ),
                    Species::Herbivore => apply_animal_rule(
                        &mut self.grid,
                        pos,
                        &HERBIVORE_RULES,
                        &mut self.dice,
                        &mut summary,
                    ),
                    Species::Carnivore => apply_animal_rule(
                        &mut self.grid,
                        pos,
                        &CARNIVORE_RULES,
                        &mut self.dice,
                        &mut summary,
                    ),
                }
            }
        }

        self.grid.clear_acted();
        self.emit_tick_metrics(&summary);
        self.last_summary = Some(summary);

        &self.grid
    }

    fn emit_tick_metrics(&self, summary: &TickSummary) {
        let census = self.grid.census();

        debug!(
            event = "tick_complete",
            tick = summary.tick,
            births = summary.births,
            deaths = summary.deaths,
            meals = summary.meals,
            moves = summary.moves,
            plants = census.plants,
            herbivores = census.herbivores,
            carnivores = census.carnivores,
            "Tick complete"
        );

        for species in Species::all() {
            event!(
                Level::DEBUG,
                gauge_name = "population",
                gauge_value = census.count(species),
                species = %species,
                tick = summary.tick,
                "Population gauge"
            );
        }

        if census.is_extinct() && summary.deaths > 0 {
            info!(tick = summary.tick, "Last entity died; grid is empty");
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn id(&self) -> SimulationId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Ticks advanced since the last initialization
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_summary(&self) -> Option<&TickSummary> {
        self.last_summary.as_ref()
    }

    pub fn census(&self) -> Census {
        self.grid.census()
    }
}

/// Convert a validated population count into a number of cells to fill
fn placement_count(count: u64) -> Result<usize> {
    usize::try_from(count)
        .map_err(|_| Error::Validation(format!("population count {count} does not fit this platform")))
}
