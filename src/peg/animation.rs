//! Per-peg animation state and the tick loops that drive it.

use super::PegInner;
use crate::core::Disc;
use crate::dispatch::{DiscColor, ElementId, GateError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Offset at which a lifted disc leaves its peg and a dropped disc enters it.
pub const LIFTED_OFFSET: u32 = 12;

/// Which way a floating disc travels.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Direction {
    /// Popped: moving up from its slot to [`LIFTED_OFFSET`].
    Lift,
    /// Pushed: moving down from [`LIFTED_OFFSET`] to its slot.
    Drop,
}

/// The disc currently mid-animation on a peg.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FloatingDisc {
    pub disc: Disc,
    pub direction: Direction,
    /// Current vertical slot.
    pub offset: u32,
    /// Where the animation ends.
    pub target: u32,
    pub color: DiscColor,
}

/// Animation state of one peg. At most one disc floats at a time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating(FloatingDisc),
}

impl AnimationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn floating(&self) -> Option<&FloatingDisc> {
        match self {
            Self::Idle => None,
            Self::Animating(floating) => Some(floating),
        }
    }
}

/// One running animation: walks a single element one slot per tick.
pub(super) struct TickLoop {
    pub(super) peg: Arc<PegInner>,
    pub(super) element: ElementId,
    pub(super) tick: Duration,
    pub(super) cancel: CancellationToken,
}

impl TickLoop {
    /// Walk a pushed disc from the lifted offset down to `resting`, then
    /// repaint it in the resting color.
    pub(super) async fn drop_to(self, resting: u32) {
        let mut offset = LIFTED_OFFSET;
        let mut outcome = Ok(());
        while offset >= resting {
            if self.cancel.is_cancelled() {
                break;
            }
            outcome = self.move_to(offset).await;
            if outcome.is_err() || !self.pause().await {
                break;
            }
            offset -= 1;
        }

        if outcome.is_ok() {
            let (id, element) = (self.peg.id, self.element);
            outcome = self
                .peg
                .gate
                .invoke(move |scene| {
                    scene.set_offset(id, element, resting);
                    scene.set_color(id, element, DiscColor::Resting);
                })
                .await;
        }
        self.finish("drop", outcome);
    }

    /// Walk a popped disc, already recolored, from `slot` up to the lifted
    /// offset after a one-tick pause, then discard its element.
    pub(super) async fn lift_from(self, slot: u32) {
        let mut outcome = Ok(());
        if self.pause().await {
            let mut offset = slot;
            while offset < LIFTED_OFFSET {
                if self.cancel.is_cancelled() {
                    break;
                }
                outcome = self.move_to(offset).await;
                if outcome.is_err() || !self.pause().await {
                    break;
                }
                offset += 1;
            }
        }

        if outcome.is_ok() {
            let (id, element) = (self.peg.id, self.element);
            outcome = self
                .peg
                .gate
                .invoke(move |scene| {
                    scene.remove(id, element);
                })
                .await;
        }
        self.finish("lift", outcome);
    }

    async fn move_to(&self, offset: u32) -> Result<(), GateError> {
        let (id, element) = (self.peg.id, self.element);
        self.peg
            .gate
            .invoke(move |scene| {
                scene.set_offset(id, element, offset);
            })
            .await?;
        self.peg.animation.send_modify(|state| {
            if let AnimationState::Animating(floating) = state {
                floating.offset = offset;
            }
        });
        Ok(())
    }

    /// Sleep one tick. Returns `false` if the stop signal arrived first.
    async fn pause(&self) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(self.tick) => true,
        }
    }

    fn finish(self, kind: &str, outcome: Result<(), GateError>) {
        let peg = self.peg.id;
        if let Err(e) = outcome {
            warn!(%peg, kind, error = %e, "animation ended without finishing its visual update");
        } else if self.cancel.is_cancelled() {
            debug!(%peg, kind, "animation stopped early");
        } else {
            debug!(%peg, kind, "animation finished");
        }
        self.peg.release_slot();
    }
}
