//! Animated disc stack for a single peg.
//!
//! A [`PegStack`] is a plain ordered container of discs plus a single-slot
//! animation state machine:
//!
//! ```text
//! Idle --push_animated / pop_animated--> Animating --ticks, then done or stop--> Idle
//! ```
//!
//! The logical stack changes as soon as an animated operation is accepted.
//! The visual element follows on a background task, one slot per tick, with
//! every visual change marshalled through the peg's [`SceneGate`]. While a
//! disc floats, further animated operations on the same peg are rejected,
//! never queued.

mod animation;

pub use animation::{AnimationState, Direction, FloatingDisc, LIFTED_OFFSET};

use crate::core::{Disc, PegId, MAX_DISCS};
use crate::dispatch::{DiscColor, DiscElement, ElementId, GateError, SceneGate};
use animation::TickLoop;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Tick duration of a peg that has not been configured.
pub const DEFAULT_DISC_SPEED: Duration = Duration::from_millis(70);

/// What a renderer needs to draw one peg.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PegSnapshot {
    pub peg: PegId,
    /// Disc sizes, bottom to top.
    pub discs: Vec<Disc>,
    pub floating: Option<FloatingDisc>,
}

/// One peg: its discs and at most one in-flight animation.
///
/// Cloning yields another handle to the same peg.
#[derive(Clone)]
pub struct PegStack {
    inner: Arc<PegInner>,
}

pub(crate) struct PegInner {
    id: PegId,
    gate: SceneGate,
    stack: Mutex<StackState>,
    animation: watch::Sender<AnimationState>,
    disc_speed_ms: AtomicU64,
}

/// A disc on the logical stack and the element drawing it.
#[derive(Clone, Copy, Debug)]
struct Resting {
    disc: Disc,
    element: ElementId,
}

/// Logical contents of a peg.
///
/// Every change to it submits the matching scene work before the lock is
/// released, so the scene sees changes in the same order as the stack. The
/// floating disc of a lift is never in `resting`.
#[derive(Default)]
struct StackState {
    resting: Vec<Resting>,
    /// Stop signal of the animation in flight, if any.
    cancel: Option<CancellationToken>,
}

impl StackState {
    fn is_full(&self) -> bool {
        self.resting.len() >= usize::from(MAX_DISCS)
    }

    /// Resting offset of the next disc pushed.
    fn next_slot(&self) -> u32 {
        self.resting.len() as u32 + 1
    }

    fn discs(&self) -> Vec<Disc> {
        self.resting.iter().map(|r| r.disc).collect()
    }
}

impl PegInner {
    /// Claim the animation slot for `floating`. Fails if a disc already floats.
    fn claim_slot(
        &self,
        stack: &mut StackState,
        floating: FloatingDisc,
    ) -> Option<CancellationToken> {
        if !self.animation.borrow().is_idle() {
            return None;
        }
        let cancel = CancellationToken::new();
        stack.cancel = Some(cancel.clone());
        self.animation
            .send_replace(AnimationState::Animating(floating));
        Some(cancel)
    }

    fn release_slot(&self) {
        let mut stack = self.stack.lock();
        stack.cancel = None;
        self.animation.send_replace(AnimationState::Idle);
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(self.disc_speed_ms.load(Ordering::Relaxed))
    }
}

impl PegStack {
    /// Create an empty peg drawing onto the scene behind `gate`.
    pub fn new(id: PegId, gate: SceneGate) -> Self {
        let (animation, _) = watch::channel(AnimationState::Idle);
        Self {
            inner: Arc::new(PegInner {
                id,
                gate,
                stack: Mutex::new(StackState::default()),
                animation,
                disc_speed_ms: AtomicU64::new(DEFAULT_DISC_SPEED.as_millis() as u64),
            }),
        }
    }

    pub fn id(&self) -> PegId {
        self.inner.id
    }

    pub fn disc_speed(&self) -> Duration {
        self.inner.tick()
    }

    /// Set the tick duration used by animations started after this call.
    pub fn set_disc_speed(&self, tick: Duration) {
        let millis = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);
        self.inner.disc_speed_ms.store(millis, Ordering::Relaxed);
    }

    /// Disc sizes, bottom to top.
    pub fn discs(&self) -> Vec<Disc> {
        self.inner.stack.lock().discs()
    }

    pub fn len(&self) -> usize {
        self.inner.stack.lock().resting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn animation_state(&self) -> AnimationState {
        *self.inner.animation.borrow()
    }

    pub fn is_animating(&self) -> bool {
        !self.inner.animation.borrow().is_idle()
    }

    /// Receiver that observes every animation state change, tick by tick.
    pub fn watch_animation(&self) -> watch::Receiver<AnimationState> {
        self.inner.animation.subscribe()
    }

    pub fn snapshot(&self) -> PegSnapshot {
        let stack = self.inner.stack.lock();
        PegSnapshot {
            peg: self.inner.id,
            discs: stack.discs(),
            floating: self.inner.animation.borrow().floating().copied(),
        }
    }

    /// Reset the peg to hold `disc_count` discs, largest at the bottom.
    ///
    /// A floating disc is stopped first. Counts above [`MAX_DISCS`] are capped.
    pub async fn create_empty(&self, disc_count: u8) -> Result<(), GateError> {
        self.stop().await;

        let id = self.inner.id;
        let pending = {
            let mut stack = self.inner.stack.lock();
            stack.resting = (1..=disc_count.min(MAX_DISCS))
                .rev()
                .filter_map(Disc::new)
                .map(|disc| Resting {
                    disc,
                    element: ElementId::next(),
                })
                .collect();
            let elements: Vec<DiscElement> = (1..)
                .zip(&stack.resting)
                .map(|(slot, r)| DiscElement {
                    id: r.element,
                    disc: r.disc,
                    offset: slot,
                    color: DiscColor::Resting,
                })
                .collect();
            self.inner.gate.submit(move |scene| {
                scene.clear(id);
                for element in elements {
                    scene.place(id, element);
                }
            })
        };
        pending.wait().await
    }

    /// Add a disc on top without animation. Ignored when the peg is full.
    pub async fn push_immediate(&self, disc: Disc) -> Result<bool, GateError> {
        let id = self.inner.id;
        let pending = {
            let mut stack = self.inner.stack.lock();
            if stack.is_full() {
                return Ok(false);
            }
            let element = DiscElement {
                id: ElementId::next(),
                disc,
                offset: stack.next_slot(),
                color: DiscColor::Resting,
            };
            stack.resting.push(Resting {
                disc,
                element: element.id,
            });
            self.inner.gate.submit(move |scene| scene.place(id, element))
        };
        pending.wait().await?;
        Ok(true)
    }

    /// Remove the top resting disc without animation. `None` when the peg is
    /// empty. A disc being lifted off is already gone and is left alone.
    pub async fn pop_immediate(&self) -> Result<Option<Disc>, GateError> {
        let id = self.inner.id;
        let (disc, pending) = {
            let mut stack = self.inner.stack.lock();
            let Some(top) = stack.resting.pop() else {
                return Ok(None);
            };
            let element = top.element;
            let pending = self.inner.gate.submit(move |scene| {
                scene.remove(id, element);
            });
            (top.disc, pending)
        };
        pending.wait().await?;
        Ok(Some(disc))
    }

    /// Drop `disc` onto the peg from the lifted offset.
    ///
    /// Returns `Ok(false)` without doing anything if a disc is already
    /// floating or the peg is full. Otherwise the disc is on the logical stack
    /// when this returns, and a background task settles its element.
    pub async fn push_animated(&self, disc: Disc) -> Result<bool, GateError> {
        let id = self.inner.id;
        let (cancel, element, slot, pending) = {
            let mut stack = self.inner.stack.lock();
            if stack.is_full() {
                return Ok(false);
            }
            let slot = stack.next_slot();
            let floating = FloatingDisc {
                disc,
                direction: Direction::Drop,
                offset: LIFTED_OFFSET,
                target: slot,
                color: DiscColor::InMotion,
            };
            let Some(cancel) = self.inner.claim_slot(&mut stack, floating) else {
                return Ok(false);
            };
            let element = DiscElement {
                id: ElementId::next(),
                disc,
                offset: LIFTED_OFFSET,
                color: DiscColor::InMotion,
            };
            stack.resting.push(Resting {
                disc,
                element: element.id,
            });
            let pending = self.inner.gate.submit(move |scene| scene.place(id, element));
            (cancel, element.id, slot, pending)
        };

        if let Err(e) = pending.wait().await {
            self.inner
                .stack
                .lock()
                .resting
                .retain(|r| r.element != element);
            self.inner.release_slot();
            return Err(e);
        }

        debug!(peg = %id, %disc, slot, "drop started");
        let tick_loop = TickLoop {
            peg: Arc::clone(&self.inner),
            element,
            tick: self.inner.tick(),
            cancel,
        };
        tokio::spawn(tick_loop.drop_to(slot));
        Ok(true)
    }

    /// Lift the top disc off the peg.
    ///
    /// Returns `Ok(None)` without doing anything if a disc is already
    /// floating or the peg is empty. Otherwise the disc is gone from the
    /// logical stack when this returns, and a background task lifts and
    /// discards its element.
    pub async fn pop_animated(&self) -> Result<Option<Disc>, GateError> {
        let id = self.inner.id;
        let (cancel, top, slot, pending) = {
            let mut stack = self.inner.stack.lock();
            let Some(&top) = stack.resting.last() else {
                return Ok(None);
            };
            let slot = stack.resting.len() as u32;
            let floating = FloatingDisc {
                disc: top.disc,
                direction: Direction::Lift,
                offset: slot,
                target: LIFTED_OFFSET,
                color: DiscColor::InMotion,
            };
            let Some(cancel) = self.inner.claim_slot(&mut stack, floating) else {
                return Ok(None);
            };
            stack.resting.pop();
            let element = top.element;
            let pending = self.inner.gate.submit(move |scene| {
                scene.set_color(id, element, DiscColor::InMotion);
            });
            (cancel, top, slot, pending)
        };

        if let Err(e) = pending.wait().await {
            {
                let mut stack = self.inner.stack.lock();
                let at = (slot as usize - 1).min(stack.resting.len());
                stack.resting.insert(at, top);
            }
            self.inner.release_slot();
            return Err(e);
        }

        debug!(peg = %id, disc = %top.disc, slot, "lift started");
        let tick_loop = TickLoop {
            peg: Arc::clone(&self.inner),
            element: top.element,
            tick: self.inner.tick(),
            cancel,
        };
        tokio::spawn(tick_loop.lift_from(slot));
        Ok(Some(top.disc))
    }

    /// Wait until no disc is floating on this peg.
    pub async fn wait_for_animation_completion(&self) {
        let mut rx = self.inner.animation.subscribe();
        let _ = rx.wait_for(AnimationState::is_idle).await;
    }

    /// Cut the floating disc's animation short and wait for it to settle.
    ///
    /// The logical stack is left as it is: a popped disc stays popped and a
    /// pushed disc stays pushed.
    pub async fn stop(&self) {
        let cancel = self.inner.stack.lock().cancel.clone();
        if let Some(cancel) = cancel {
            cancel.cancel();
            self.wait_for_animation_completion().await;
        }
    }
}
