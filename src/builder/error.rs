//! Build errors for the simulation builder.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a simulation.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Dispatch gate not specified. Call .gate(gate) or .spawn_gate() before .build()")]
    MissingGate,

    #[error("Could not start the dispatch owner thread: {0}")]
    GateSpawn(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
