//! Console Simulation
//!
//! This example runs a full animated simulation and prints each move as it
//! completes, then the final contents of every peg.
//!
//! Key concepts:
//! - Layered configuration (defaults, then `HANOI_*` environment overrides)
//! - A dedicated thread owning the scene
//! - Observing progress through the event stream
//! - Cooperative stop with Ctrl-C
//!
//! Run with: cargo run --example console_simulation
//! Try: HANOI_DISCS=5 HANOI_DISC_SPEED_MS=10 RUST_LOG=hanoi_motion=debug cargo run --example console_simulation

use hanoi_motion::core::PegId;
use hanoi_motion::{Simulation, SimulationConfig, SimulationEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SimulationConfig::default().with_env_overrides()?;
    println!("=== Console Simulation ===\n");
    println!(
        "{} discs, {} ms per tick\n",
        config.disc_count, config.disc_speed_ms
    );

    let sim = Simulation::builder().config(config).spawn_gate()?.build()?;
    sim.seed().await?;

    let mut events = sim.subscribe();
    sim.start()?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping after the current move...");
                sim.stop();
            }
            event = events.recv() => match event {
                Ok(SimulationEvent::MoveOccurred { index, mv, .. }) => {
                    println!("  move {:>3}: {}", index + 1, mv);
                }
                Ok(SimulationEvent::RunFinished { moves_processed, cancelled, .. }) => {
                    println!("\n{moves_processed} moves processed (cancelled: {cancelled})");
                    break;
                }
                Ok(SimulationEvent::RunStarted { .. }) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
        }
    }

    if let Some(summary) = sim.join().await? {
        if let Some(duration) = summary.history.duration() {
            println!("Elapsed between first and last move: {duration:?}");
        }
    }

    println!("\nFinal pegs:");
    for peg in PegId::ALL {
        let snapshot = sim.peg(peg).snapshot();
        let sizes: Vec<String> = snapshot.discs.iter().map(ToString::to_string).collect();
        println!("  peg {peg}: [{}]", sizes.join(", "));
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
