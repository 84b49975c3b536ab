//! Broadcast of simulation progress to observers.

use crate::core::Move;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Progress notifications. For logging and telemetry only: the orchestrator
/// already drives every animation, so observers must not react by moving discs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationEvent {
    RunStarted {
        run_id: Uuid,
        disc_count: u8,
    },
    /// Both animation phases of a move have completed.
    MoveOccurred {
        run_id: Uuid,
        index: u64,
        mv: Move,
    },
    RunFinished {
        run_id: Uuid,
        moves_processed: usize,
        cancelled: bool,
    },
}

impl SimulationEvent {
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::MoveOccurred { run_id, .. }
            | Self::RunFinished { run_id, .. } => *run_id,
        }
    }
}

/// Broadcast-based event emitter.
///
/// Non-blocking: `emit` never waits, so a slow observer cannot stall the
/// move generator. Lagging receivers lose the oldest events instead.
pub struct EventEmitter {
    tx: broadcast::Sender<SimulationEvent>,
    emit_count: AtomicU64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            emit_count: AtomicU64::new(0),
        }
    }

    /// Emit an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    pub fn emit(&self, event: SimulationEvent) -> usize {
        self.emit_count.fetch_add(1, Ordering::Relaxed);
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SimulationEvent> {
        self.tx.subscribe()
    }

    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}
