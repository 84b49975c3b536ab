//! Move history tracking.
//!
//! Provides immutable tracking of the moves a simulation run has processed,
//! following functional programming principles.

use super::disc::Move;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single processed move.
///
/// # Example
///
/// ```rust
/// use hanoi_motion::core::{Move, MoveRecord, PegId};
/// use chrono::Utc;
///
/// let record = MoveRecord {
///     index: 0,
///     mv: Move::new(PegId::Left, PegId::Right),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.mv.to, PegId::Right);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Position of the move in the generated sequence (0-based)
    pub index: u64,
    /// The move that was carried out
    pub mv: Move,
    /// When both animation phases of the move completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of processed moves.
///
/// History is immutable - the `record` method returns a new history
/// with the move added.
///
/// # Example
///
/// ```rust
/// use hanoi_motion::core::{Move, MoveHistory, MoveRecord, PegId};
/// use chrono::Utc;
///
/// let history = MoveHistory::new();
/// let history = history.record(MoveRecord {
///     index: 0,
///     mv: Move::new(PegId::Left, PegId::Middle),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.len(), 1);
/// assert_eq!(history.moves(), vec![Move::new(PegId::Left, PegId::Middle)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a move, returning a new history.
    ///
    /// This is a pure function - it does not mutate the existing history
    /// but returns a new one with the move added.
    pub fn record(&self, record: MoveRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// The moves in processing order.
    pub fn moves(&self) -> Vec<Move> {
        self.records.iter().map(|r| r.mv).collect()
    }

    /// Time between the first and the last completed move.
    ///
    /// Returns `None` if no move has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last
                .timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok(),
            _ => None,
        }
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
