//! End-to-end tests of the animated pipeline.
//!
//! Every test runs the real pegs and gate with a 1 ms tick.

use hanoi_motion::core::{Disc, MoveSequencer, PegId};
use hanoi_motion::dispatch::DiscColor;
use hanoi_motion::{RunSummary, Simulation, SimulationEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fast_simulation(disc_count: u8) -> Simulation {
    Simulation::builder()
        .disc_count(disc_count)
        .disc_speed(Duration::from_millis(1))
        .spawn_gate()
        .unwrap()
        .build()
        .unwrap()
}

fn sizes(sim: &Simulation, peg: PegId) -> Vec<u8> {
    sim.peg(peg).discs().into_iter().map(Disc::size).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn full_run_reports_every_move_in_order() {
    let sim = fast_simulation(3);
    sim.seed().await.unwrap();
    let mut events = sim.subscribe();

    let run_id = sim.start().unwrap().unwrap();
    let summary = sim.join().await.unwrap().unwrap();

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert_eq!(
        received.first(),
        Some(&SimulationEvent::RunStarted {
            run_id,
            disc_count: 3
        })
    );
    let moves: Vec<_> = received
        .iter()
        .filter_map(|event| match event {
            SimulationEvent::MoveOccurred { index, mv, .. } => Some((*index, *mv)),
            _ => None,
        })
        .collect();
    let expected: Vec<_> = MoveSequencer::moves(3)
        .into_iter()
        .enumerate()
        .map(|(i, mv)| (i as u64, mv))
        .collect();
    assert_eq!(moves, expected);
    assert_eq!(
        received.last(),
        Some(&SimulationEvent::RunFinished {
            run_id,
            moves_processed: 7,
            cancelled: false
        })
    );

    assert_eq!(summary.history.len(), 7);
    assert_eq!(sizes(&sim, PegId::Right), vec![3, 2, 1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_after_move_bounds_the_processed_prefix() {
    let sim = fast_simulation(4);
    sim.seed().await.unwrap();
    let mut events = sim.subscribe();
    let stop_after = 2;

    sim.start().unwrap();
    while let Ok(event) = events.recv().await {
        if let SimulationEvent::MoveOccurred { index, .. } = event {
            if index == stop_after {
                assert!(sim.stop());
                break;
            }
        }
    }
    let summary = sim.join().await.unwrap().unwrap();

    assert!(summary.cancelled);
    assert!(summary.history.len() as u64 <= stop_after + 2);
    assert!(summary
        .history
        .records()
        .iter()
        .all(|record| record.index <= stop_after + 1));
    assert!(sim.pegs().iter().all(|peg| !peg.is_animating()));

    // discs are conserved and every peg stays ordered
    let mut all: Vec<u8> = PegId::ALL.iter().flat_map(|&p| sizes(&sim, p)).collect();
    all.sort_unstable();
    assert_eq!(all, vec![1, 2, 3, 4]);
    for peg in PegId::ALL {
        let stack = sizes(&sim, peg);
        assert!(stack.windows(2).all(|w| w[0] > w[1]), "{peg}: {stack:?}");
    }
}

/// Start a 3-disc run, wait until `peg` animates during the first move, then
/// stop. The first move lifts from the left peg and drops on the right one.
async fn stop_during_first_move(peg: PegId) -> (Simulation, RunSummary) {
    let sim = fast_simulation(3);
    sim.set_disc_speed(Duration::from_millis(10)).unwrap();
    sim.seed().await.unwrap();

    sim.start().unwrap();
    while !sim.peg(peg).is_animating() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert!(sim.stop());
    let summary = sim.join().await.unwrap().unwrap();
    (sim, summary)
}

fn assert_only_first_move_completed(sim: &Simulation, summary: &RunSummary) {
    let first = MoveSequencer::moves(3)[0];
    assert_eq!(first.from, PegId::Left);
    assert_eq!(first.to, PegId::Right);

    assert!(summary.cancelled);
    assert_eq!(summary.history.moves(), vec![first]);
    assert!(summary.history.records().iter().all(|r| r.index == 0));
    assert_eq!(sizes(sim, PegId::Left), vec![3, 2]);
    assert!(sizes(sim, PegId::Middle).is_empty());
    assert_eq!(sizes(sim, PegId::Right), vec![1]);
    assert!(sim.pegs().iter().all(|peg| !peg.is_animating()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_during_lift_lets_the_move_finish() {
    let (sim, summary) = stop_during_first_move(PegId::Left).await;
    assert_only_first_move_completed(&sim, &summary);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_during_drop_lets_the_move_finish() {
    let (sim, summary) = stop_during_first_move(PegId::Right).await;
    assert_only_first_move_completed(&sim, &summary);

    let drawn = sim
        .gate()
        .invoke(|scene| {
            scene
                .elements(PegId::Right)
                .iter()
                .map(|e| (e.disc.size(), e.offset, e.color))
                .collect::<Vec<_>>()
        })
        .await
        .unwrap();
    assert_eq!(drawn, vec![(1, 1, DiscColor::Resting)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn at_most_one_disc_is_ever_in_motion() {
    let sim = fast_simulation(3);
    sim.seed().await.unwrap();

    let gate = sim.gate().clone();
    let done = Arc::new(AtomicBool::new(false));
    let monitor_done = Arc::clone(&done);
    let monitor = tokio::spawn(async move {
        let mut max_in_motion = 0;
        while !monitor_done.load(Ordering::Acquire) {
            let in_motion = gate
                .invoke(|scene| {
                    PegId::ALL
                        .iter()
                        .flat_map(|&peg| scene.elements(peg).iter())
                        .filter(|element| element.color == DiscColor::InMotion)
                        .count()
                })
                .await
                .unwrap();
            max_in_motion = max_in_motion.max(in_motion);
            tokio::time::sleep(Duration::from_micros(200)).await;
        }
        max_in_motion
    });

    sim.start().unwrap();
    sim.join().await.unwrap();
    done.store(true, Ordering::Release);

    let max_in_motion = monitor.await.unwrap();
    assert!(max_in_motion <= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scene_matches_logical_stacks_after_run() {
    let sim = fast_simulation(2);
    sim.seed().await.unwrap();

    sim.start().unwrap();
    sim.join().await.unwrap();

    for peg in PegId::ALL {
        let drawn = sim
            .gate()
            .invoke(move |scene| {
                scene
                    .elements(peg)
                    .iter()
                    .map(|e| (e.disc.size(), e.offset, e.color))
                    .collect::<Vec<_>>()
            })
            .await
            .unwrap();
        let expected: Vec<_> = sizes(&sim, peg)
            .into_iter()
            .zip(1u32..)
            .map(|(size, slot)| (size, slot, DiscColor::Resting))
            .collect();
        assert_eq!(drawn, expected, "peg {peg}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn simulation_can_run_again_after_reseeding() {
    let sim = fast_simulation(1);
    sim.seed().await.unwrap();
    sim.start().unwrap();
    sim.join().await.unwrap();
    assert_eq!(sizes(&sim, PegId::Right), vec![1]);

    sim.set_disc_count(2).await.unwrap();
    assert!(sim.start().unwrap().is_some());
    let summary = sim.join().await.unwrap().unwrap();

    assert_eq!(summary.disc_count, 2);
    assert_eq!(sizes(&sim, PegId::Right), vec![2, 1]);
}
