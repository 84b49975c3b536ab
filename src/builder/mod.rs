//! Builder API for ergonomic simulation construction.

pub mod error;
pub mod simulation;

pub use error::BuildError;
pub use simulation::SimulationBuilder;
