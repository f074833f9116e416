//! World simulation engine.
//!
//! This crate implements the bounded grid where plants, herbivores and
//! carnivores live, together with the tick engine that advances it.

pub mod dice;
pub mod grid;
pub mod rules;
pub mod simulation;

pub use dice::Dice;
pub use grid::Grid;
pub use simulation::Simulation;
