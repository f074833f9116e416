//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Too many entities: {requested} requested, grid holds {capacity}")]
    TooManyEntities { requested: u64, capacity: u64 },

    #[error("Validation error: {0}")]
    Validation(String),
}
