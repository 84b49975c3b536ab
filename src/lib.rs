//! Hanoi Motion: an animated three-peg disc-transfer engine
//!
//! The puzzle itself is a five-line recursion. What this crate is really
//! about is keeping that recursion in step with animations that are much
//! slower than it is.
//!
//! # Core Concepts
//!
//! - **Sequencer**: pure recursive generator of the optimal move order
//! - **Pegs**: disc stacks with a single-slot animation state machine and a
//!   completion barrier
//! - **Dispatch gate**: every visual change runs on one owning thread
//! - **Simulation**: runs the sequencer on a blocking task and paces it
//!   against the lift and drop animations of each move, with cooperative stop
//!
//! # Example
//!
//! ```rust
//! use hanoi_motion::core::PegId;
//! use hanoi_motion::Simulation;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "multi_thread", worker_threads = 2)]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sim = Simulation::builder()
//!     .disc_count(2)
//!     .disc_speed(Duration::from_millis(1))
//!     .spawn_gate()?
//!     .build()?;
//!
//! sim.seed().await?;
//! sim.start()?;
//! let summary = sim.join().await?.expect("run summary");
//!
//! assert_eq!(summary.history.len(), 3);
//! assert_eq!(sim.peg(PegId::Right).len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod peg;
pub mod simulation;

// Re-export commonly used types
pub use builder::{BuildError, SimulationBuilder};
pub use config::{ConfigError, SimulationConfig};
pub use core::{Disc, Move, MoveSequencer, PegId};
pub use dispatch::{DispatchGate, GateError, Scene, SceneGate};
pub use peg::{AnimationState, PegStack};
pub use simulation::{PegAssignment, RunSummary, Simulation, SimulationError, SimulationEvent};
