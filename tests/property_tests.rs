//! Property-based tests for move generation and history.
//!
//! These tests use proptest to verify properties hold across
//! every supported disc count and arbitrary peg roles.

use chrono::Utc;
use hanoi_motion::core::{Disc, Move, MoveHistory, MoveRecord, MoveSequencer, PegId, MAX_DISCS};
use proptest::prelude::*;

/// Three plain stacks, bottom to top, for replaying moves without animation.
fn replay(disc_count: u8, source: PegId, moves: &[Move]) -> [Vec<u8>; 3] {
    let mut pegs: [Vec<u8>; 3] = Default::default();
    pegs[source.index()] = (1..=disc_count).rev().collect();
    for mv in moves {
        let disc = pegs[mv.from.index()]
            .pop()
            .expect("move from an empty peg");
        if let Some(&top) = pegs[mv.to.index()].last() {
            assert!(top > disc, "disc {disc} placed on smaller disc {top}");
        }
        pegs[mv.to.index()].push(disc);
    }
    pegs
}

prop_compose! {
    fn arbitrary_roles()(rotation in 0..6usize) -> (PegId, PegId, PegId) {
        use PegId::{Left as L, Middle as M, Right as R};
        [(L, M, R), (L, R, M), (M, L, R), (M, R, L), (R, L, M), (R, M, L)][rotation]
    }
}

proptest! {
    #[test]
    fn emits_two_to_the_n_minus_one_moves(disc_count in 0..=MAX_DISCS) {
        let moves = MoveSequencer::moves(disc_count);
        prop_assert_eq!(moves.len() as u64, MoveSequencer::move_count(disc_count));
        prop_assert_eq!(moves.len() as u64, (1u64 << disc_count) - 1);
    }

    #[test]
    fn replay_moves_whole_tower_to_destination(
        disc_count in 0..=MAX_DISCS,
        (source, spare, destination) in arbitrary_roles()
    ) {
        let mut moves = Vec::new();
        MoveSequencer::generate(disc_count, source, spare, destination, &mut |from, to| {
            moves.push(Move::new(from, to))
        });

        let pegs = replay(disc_count, source, &moves);
        let expected: Vec<u8> = (1..=disc_count).rev().collect();
        prop_assert_eq!(&pegs[destination.index()], &expected);
        prop_assert!(pegs[source.index()].is_empty());
        prop_assert!(pegs[spare.index()].is_empty());
    }

    #[test]
    fn generation_is_deterministic(disc_count in 0..=MAX_DISCS) {
        prop_assert_eq!(MoveSequencer::moves(disc_count), MoveSequencer::moves(disc_count));
    }

    #[test]
    fn no_move_stays_on_the_same_peg(disc_count in 1..=MAX_DISCS) {
        prop_assert!(MoveSequencer::moves(disc_count).iter().all(|mv| mv.from != mv.to));
    }

    #[test]
    fn history_preserves_order(disc_count in 0..=MAX_DISCS) {
        let moves = MoveSequencer::moves(disc_count);
        let history = moves
            .iter()
            .enumerate()
            .fold(MoveHistory::new(), |history, (index, mv)| {
                history.record(MoveRecord {
                    index: index as u64,
                    mv: *mv,
                    timestamp: Utc::now(),
                })
            });

        prop_assert_eq!(history.moves(), moves);
    }

    #[test]
    fn disc_construction_matches_range(size in any::<u8>()) {
        prop_assert_eq!(Disc::new(size).is_some(), (1..=MAX_DISCS).contains(&size));
    }
}

#[test]
fn three_disc_replay_matches_reference() {
    let moves = MoveSequencer::moves(3);
    assert_eq!(moves.len(), 7);

    let pegs = replay(3, PegId::Left, &moves);
    assert_eq!(pegs, [vec![], vec![], vec![3, 2, 1]]);
}

#[test]
fn one_disc_is_a_single_direct_move() {
    assert_eq!(
        MoveSequencer::moves(1),
        vec![Move::new(PegId::Left, PegId::Right)]
    );
}
