//! Simulation control errors.

use crate::config::ConfigError;
use crate::dispatch::GateError;
use thiserror::Error;

/// Errors returned by the simulation's control surface
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("A simulation run is in progress")]
    RunInProgress,

    #[error("No Tokio runtime available to run the simulation")]
    NoRuntime,

    #[error("Simulation run failed: {0}")]
    RunFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gate(#[from] GateError),
}
