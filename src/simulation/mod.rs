//! Simulation orchestration: the control surface around the pegs.
//!
//! # Key Concepts
//!
//! - **Pacing**: the move sequencer blocks inside its callback until both
//!   animations of a move are done, so moves never overlap
//! - **Cooperative stop**: `stop()` flips a flag checked once per move
//! - **Events**: progress is broadcast for observers; it never drives pegs

mod error;
mod events;
mod orchestrator;

pub use error::SimulationError;
pub use events::{EventEmitter, SimulationEvent};
pub use orchestrator::{PegAssignment, RunSummary, Simulation};
