//! Single-owner visual state.
//!
//! Every change to what is drawn (adding or removing a disc, recoloring it,
//! moving it) runs on one owning thread. [`DispatchGate`] is the only way in:
//! it runs work inline when already on the owner, and otherwise enqueues it
//! and waits for the owner to finish it.

pub mod error;
mod gate;
mod scene;

pub use error::GateError;
pub use gate::{DispatchGate, OwnerLoop, Pending};
pub use scene::{DiscColor, DiscElement, ElementId, Scene};

/// Gate guarding the scene shared by a set of pegs.
pub type SceneGate = DispatchGate<Scene>;
