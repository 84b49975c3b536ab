//! Orchestrator pacing the move sequencer against peg animations.

use super::error::SimulationError;
use super::events::{EventEmitter, SimulationEvent};
use crate::config::{validate_disc_count, ConfigError, ConfigViolation, SimulationConfig};
use crate::core::{Move, MoveHistory, MoveRecord, MoveSequencer, PegId, MAX_DISCS};
use crate::dispatch::{GateError, SceneGate};
use crate::peg::PegStack;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// How many discs each peg holds after a reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegAssignment {
    counts: [u8; 3],
}

impl PegAssignment {
    /// `disc_count` discs on the left peg, the others empty.
    pub fn seeded(disc_count: u8) -> Self {
        Self {
            counts: [disc_count, 0, 0],
        }
    }

    pub fn cleared() -> Self {
        Self { counts: [0; 3] }
    }

    /// Explicit counts per peg, left to right. Each is capped at [`MAX_DISCS`].
    pub fn new(left: u8, middle: u8, right: u8) -> Self {
        Self {
            counts: [left, middle, right].map(|n| n.min(MAX_DISCS)),
        }
    }

    pub fn disc_count(&self, peg: PegId) -> u8 {
        self.counts[peg.index()]
    }
}

/// Outcome of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub disc_count: u8,
    /// Moves whose animations both completed, in order.
    pub history: MoveHistory,
    /// True if the run was stopped before every move was processed.
    pub cancelled: bool,
}

/// Transient state of one `start`.
struct SimulationRun {
    id: Uuid,
    active: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    handle: Option<JoinHandle<RunSummary>>,
}

impl SimulationRun {
    fn is_live(&self) -> bool {
        !self.finished.load(Ordering::Acquire)
    }
}

/// Three animated pegs driven by the optimal move sequence.
///
/// The sequencer runs on a blocking task. For each move it emits, the
/// orchestrator lifts the source disc, waits for that animation, drops the
/// disc on the destination and waits again before the sequencer may emit the
/// next move. [`stop`](Self::stop) is cooperative and observed once per move.
pub struct Simulation {
    pegs: [PegStack; 3],
    gate: SceneGate,
    config: Mutex<SimulationConfig>,
    events: Arc<EventEmitter>,
    run: Mutex<Option<SimulationRun>>,
}

impl Simulation {
    /// Create a simulation drawing onto the scene behind `gate`.
    ///
    /// Pegs start empty; call [`seed`](Self::seed) or [`reset`](Self::reset)
    /// to place discs.
    pub fn new(config: SimulationConfig, gate: SceneGate) -> Result<Self, ConfigError> {
        Self::with_emitter(config, gate, EventEmitter::new())
    }

    pub(crate) fn with_emitter(
        config: SimulationConfig,
        gate: SceneGate,
        events: EventEmitter,
    ) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let pegs = PegId::ALL.map(|id| PegStack::new(id, gate.clone()));
        for peg in &pegs {
            peg.set_disc_speed(config.disc_speed());
        }
        Ok(Self {
            pegs,
            gate,
            config: Mutex::new(config),
            events: Arc::new(events),
            run: Mutex::new(None),
        })
    }

    pub fn builder() -> crate::builder::SimulationBuilder {
        crate::builder::SimulationBuilder::new()
    }

    pub fn peg(&self, id: PegId) -> &PegStack {
        &self.pegs[id.index()]
    }

    pub fn pegs(&self) -> &[PegStack; 3] {
        &self.pegs
    }

    pub fn gate(&self) -> &SceneGate {
        &self.gate
    }

    pub fn config(&self) -> SimulationConfig {
        self.config.lock().clone()
    }

    /// Observe run progress. See [`SimulationEvent`].
    pub fn subscribe(&self) -> broadcast::Receiver<SimulationEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.run.lock().as_ref().is_some_and(SimulationRun::is_live)
    }

    /// Start a run with the configured disc count.
    ///
    /// Returns `Ok(None)` without doing anything while a run is active.
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(self))]
    pub fn start(&self) -> Result<Option<Uuid>, SimulationError> {
        let runtime = Handle::try_current().map_err(|_| SimulationError::NoRuntime)?;
        let mut slot = self.run.lock();
        if slot.as_ref().is_some_and(SimulationRun::is_live) {
            warn!("start ignored: a run is already active");
            return Ok(None);
        }

        let disc_count = self.config.lock().disc_count;
        let run_id = Uuid::new_v4();
        let active = Arc::new(AtomicBool::new(true));
        let finished = Arc::new(AtomicBool::new(false));

        let mut driver = MoveDriver {
            run_id,
            pegs: self.pegs.clone(),
            runtime: runtime.clone(),
            active: Arc::clone(&active),
            events: Arc::clone(&self.events),
            history: MoveHistory::new(),
            next_index: 0,
            skipped: 0,
        };
        let done = Arc::clone(&finished);

        info!(%run_id, disc_count, "simulation started");
        self.events.emit(SimulationEvent::RunStarted { run_id, disc_count });

        let handle = runtime.spawn_blocking(move || {
            MoveSequencer::new(disc_count).run(&mut |from, to| driver.handle_move(from, to));
            let summary = driver.finish(disc_count);
            done.store(true, Ordering::Release);
            summary
        });

        *slot = Some(SimulationRun {
            id: run_id,
            active,
            finished,
            handle: Some(handle),
        });
        Ok(Some(run_id))
    }

    /// Ask the active run to stop. The move in progress finishes its
    /// animations; every later move is skipped.
    ///
    /// Returns `false` if no run was active.
    #[instrument(skip(self))]
    pub fn stop(&self) -> bool {
        match self.run.lock().as_ref() {
            Some(run) if run.is_live() => {
                info!(run_id = %run.id, "stop requested");
                run.active.store(false, Ordering::Release);
                true
            }
            _ => false,
        }
    }

    /// Wait for the latest run to end and return its summary.
    ///
    /// Returns `Ok(None)` if there is no run, or its summary was already taken.
    pub async fn join(&self) -> Result<Option<RunSummary>, SimulationError> {
        let handle = match self.run.lock().as_mut() {
            Some(run) => run.handle.take(),
            None => None,
        };
        let Some(handle) = handle else {
            return Ok(None);
        };
        let summary = handle
            .await
            .map_err(|e| SimulationError::RunFailed(e.to_string()))?;
        Ok(Some(summary))
    }

    /// Re-seed all three pegs. Rejected while a run is active.
    pub async fn reset(&self, assignment: PegAssignment) -> Result<(), SimulationError> {
        if self.is_running() {
            return Err(SimulationError::RunInProgress);
        }
        for peg in &self.pegs {
            peg.create_empty(assignment.disc_count(peg.id())).await?;
        }
        debug!(?assignment, "pegs reset");
        Ok(())
    }

    /// Place the configured tower on the left peg and empty the others.
    pub async fn seed(&self) -> Result<(), SimulationError> {
        let disc_count = self.config.lock().disc_count;
        self.reset(PegAssignment::seeded(disc_count)).await
    }

    /// Empty all three pegs.
    pub async fn clear(&self) -> Result<(), SimulationError> {
        self.reset(PegAssignment::cleared()).await
    }

    /// Change the disc count and re-seed the pegs with it.
    pub async fn set_disc_count(&self, disc_count: u8) -> Result<(), SimulationError> {
        if self.is_running() {
            return Err(SimulationError::RunInProgress);
        }
        let disc_count = validate_disc_count(disc_count)?;
        self.config.lock().disc_count = disc_count;
        self.reset(PegAssignment::seeded(disc_count)).await
    }

    /// Change the tick duration of animations started from now on.
    pub fn set_disc_speed(&self, tick: Duration) -> Result<(), SimulationError> {
        let millis = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 {
            return Err(ConfigError::Invalid(vec![ConfigViolation::InvalidDiscSpeed]).into());
        }
        self.config.lock().disc_speed_ms = millis;
        for peg in &self.pegs {
            peg.set_disc_speed(tick);
        }
        Ok(())
    }
}

/// How the two animation phases of one move ended.
enum MoveOutcome {
    Completed,
    SourceEmpty,
    /// The destination was full or busy; the disc went back on the source.
    Rejected,
}

/// State owned by the blocking task of one run.
struct MoveDriver {
    run_id: Uuid,
    pegs: [PegStack; 3],
    runtime: Handle,
    active: Arc<AtomicBool>,
    events: Arc<EventEmitter>,
    history: MoveHistory,
    next_index: u64,
    skipped: u64,
}

impl MoveDriver {
    /// Move handler bound to the sequencer. Blocks until both animations of
    /// the move have completed.
    fn handle_move(&mut self, from: PegId, to: PegId) {
        let index = self.next_index;
        self.next_index += 1;

        // premature end of simulation
        if !self.active.load(Ordering::Acquire) {
            self.skipped += 1;
            return;
        }

        let mv = Move::new(from, to);
        debug!(run_id = %self.run_id, index, %from, %to, "move begin");

        let source = &self.pegs[from.index()];
        let destination = &self.pegs[to.index()];
        let outcome = self.runtime.block_on(async {
            let Some(disc) = source.pop_animated().await? else {
                return Ok(MoveOutcome::SourceEmpty);
            };
            source.wait_for_animation_completion().await;
            if !destination.push_animated(disc).await? {
                source.push_immediate(disc).await?;
                return Ok(MoveOutcome::Rejected);
            }
            destination.wait_for_animation_completion().await;
            Ok::<_, GateError>(MoveOutcome::Completed)
        });

        match outcome {
            Ok(MoveOutcome::Completed) => {
                self.history = self.history.record(MoveRecord {
                    index,
                    mv,
                    timestamp: Utc::now(),
                });
                self.events.emit(SimulationEvent::MoveOccurred {
                    run_id: self.run_id,
                    index,
                    mv,
                });
                debug!(run_id = %self.run_id, index, %from, %to, "move end");
            }
            Ok(MoveOutcome::SourceEmpty) => {
                warn!(run_id = %self.run_id, index, %from, "no disc to lift")
            }
            Ok(MoveOutcome::Rejected) => warn!(
                run_id = %self.run_id,
                index,
                %to,
                "destination rejected the disc; returned to source"
            ),
            Err(e) => warn!(run_id = %self.run_id, index, error = %e, "move not animated"),
        }
    }

    fn finish(self, disc_count: u8) -> RunSummary {
        let cancelled = self.skipped > 0;
        let moves_processed = self.history.len();
        self.events.emit(SimulationEvent::RunFinished {
            run_id: self.run_id,
            moves_processed,
            cancelled,
        });
        info!(run_id = %self.run_id, moves_processed, cancelled, "simulation finished");
        RunSummary {
            run_id: self.run_id,
            disc_count,
            history: self.history,
            cancelled,
        }
    }
}
