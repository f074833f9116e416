//! Shared application state.

use eco_world::Simulation;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared by every handler. The single mutex makes ticks and
/// re-initializations run one at a time against the grid.
#[derive(Clone)]
pub struct AppState {
    pub simulation: Arc<Mutex<Simulation>>,
}

impl AppState {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation: Arc::new(Mutex::new(simulation)),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(Simulation::seeded(seed)),
            None => Self::new(Simulation::from_entropy()),
        }
    }
}
