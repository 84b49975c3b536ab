//! Discs, pegs and moves.
//!
//! These are the plain values exchanged between the sequencer, the pegs and
//! the orchestrator. They carry no behavior beyond construction and display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of discs a single peg can hold.
pub const MAX_DISCS: u8 = 7;

/// A disc, identified only by its size (1 is the smallest).
///
/// # Example
///
/// ```rust
/// use hanoi_motion::core::{Disc, MAX_DISCS};
///
/// assert!(Disc::new(3).is_some());
/// assert!(Disc::new(0).is_none());
/// assert!(Disc::new(MAX_DISCS + 1).is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Disc(u8);

impl Disc {
    /// Create a disc of the given size, or `None` outside `1..=MAX_DISCS`.
    pub fn new(size: u8) -> Option<Self> {
        (1..=MAX_DISCS).contains(&size).then_some(Self(size))
    }

    /// The disc's size.
    pub fn size(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Disc {
    type Error = String;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        Self::new(size).ok_or_else(|| format!("disc size {size} outside 1..={MAX_DISCS}"))
    }
}

impl From<Disc> for u8 {
    fn from(disc: Disc) -> Self {
        disc.0
    }
}

impl fmt::Display for Disc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the three pegs. Numbered 1..=3 from left to right.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PegId {
    Left = 1,
    Middle = 2,
    Right = 3,
}

impl PegId {
    /// All pegs, left to right.
    pub const ALL: [PegId; 3] = [PegId::Left, PegId::Middle, PegId::Right];

    /// 1-based peg number.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// 0-based index, for addressing arrays of pegs.
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for PegId {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(Self::Left),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Right),
            other => Err(format!("peg number {other} outside 1..=3")),
        }
    }
}

impl fmt::Display for PegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Transfer of the top disc of `from` onto `to`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Move {
    pub from: PegId,
    pub to: PegId,
}

impl Move {
    pub fn new(from: PegId, to: PegId) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
