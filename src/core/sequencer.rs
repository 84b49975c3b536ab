//! Optimal move generation for the three-peg puzzle.
//!
//! The sequencer is pure: it holds no mutable state and only reports moves
//! through the callback it is given. The callback runs on the sequencer's own
//! call stack, so a callback that blocks also pauses generation. The
//! orchestrator relies on this to pace generation against animation.

use super::disc::{Move, PegId};

/// Generates the minimal move sequence for a tower of discs.
///
/// # Example
///
/// ```rust
/// use hanoi_motion::core::{MoveSequencer, PegId};
///
/// let mut moves = Vec::new();
/// MoveSequencer::new(2).run(&mut |from, to| moves.push((from, to)));
///
/// assert_eq!(
///     moves,
///     vec![
///         (PegId::Left, PegId::Middle),
///         (PegId::Left, PegId::Right),
///         (PegId::Middle, PegId::Right),
///     ]
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveSequencer {
    disc_count: u8,
}

impl MoveSequencer {
    pub fn new(disc_count: u8) -> Self {
        Self { disc_count }
    }

    pub fn disc_count(&self) -> u8 {
        self.disc_count
    }

    /// Move the whole tower from the left peg to the right peg, using the
    /// middle peg as spare.
    pub fn run<F>(&self, emit: &mut F)
    where
        F: FnMut(PegId, PegId),
    {
        Self::generate(
            self.disc_count,
            PegId::Left,
            PegId::Middle,
            PegId::Right,
            emit,
        );
    }

    /// Emit the moves that transfer `disc_count` discs from `source` to
    /// `destination`, one `emit(from, to)` call per move, in order.
    pub fn generate<F>(
        disc_count: u8,
        source: PegId,
        spare: PegId,
        destination: PegId,
        emit: &mut F,
    ) where
        F: FnMut(PegId, PegId),
    {
        if disc_count == 0 {
            return;
        }
        Self::generate(disc_count - 1, source, destination, spare, emit);
        emit(source, destination);
        Self::generate(disc_count - 1, spare, source, destination, emit);
    }

    /// Number of moves `generate` emits for `disc_count` discs.
    pub fn move_count(disc_count: u8) -> u64 {
        1u64
            .checked_shl(u32::from(disc_count))
            .map_or(u64::MAX, |n| n - 1)
    }

    /// Collect the default left-to-right sequence.
    pub fn moves(disc_count: u8) -> Vec<Move> {
        let mut moves = Vec::with_capacity(Self::move_count(disc_count.min(20)) as usize);
        Self::new(disc_count).run(&mut |from, to| moves.push(Move::new(from, to)));
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_discs_emit_nothing() {
        let mut calls = 0;
        MoveSequencer::new(0).run(&mut |_, _| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn single_disc_moves_straight_to_destination() {
        assert_eq!(
            MoveSequencer::moves(1),
            vec![Move::new(PegId::Left, PegId::Right)]
        );
    }

    #[test]
    fn three_discs_follow_canonical_order() {
        use PegId::{Left as L, Middle as M, Right as R};

        let expected: Vec<Move> = [(L, R), (L, M), (R, M), (L, R), (M, L), (M, R), (L, R)]
            .into_iter()
            .map(|(from, to)| Move::new(from, to))
            .collect();

        assert_eq!(MoveSequencer::moves(3), expected);
    }

    #[test]
    fn generate_honors_custom_peg_roles() {
        let mut moves = Vec::new();
        MoveSequencer::generate(1, PegId::Right, PegId::Left, PegId::Middle, &mut |f, t| {
            moves.push(Move::new(f, t))
        });
        assert_eq!(moves, vec![Move::new(PegId::Right, PegId::Middle)]);
    }

    #[test]
    fn move_count_matches_closed_form() {
        assert_eq!(MoveSequencer::move_count(0), 0);
        assert_eq!(MoveSequencer::move_count(4), 15);
        assert_eq!(MoveSequencer::move_count(7), 127);
    }
}
