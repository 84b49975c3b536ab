//! Pure core: disc and peg values, move generation and move history.
//!
//! Nothing in this module touches threads, timers or visual state.

mod disc;
mod history;
mod sequencer;

pub use disc::{Disc, Move, PegId, MAX_DISCS};
pub use history::{MoveHistory, MoveRecord};
pub use sequencer::MoveSequencer;
