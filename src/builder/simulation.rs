//! Builder for constructing simulations.

use crate::builder::error::BuildError;
use crate::config::SimulationConfig;
use crate::dispatch::{DispatchGate, Scene, SceneGate};
use crate::simulation::{EventEmitter, Simulation};
use std::time::Duration;

/// Builder for constructing simulations with a fluent API.
#[derive(Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    gate: Option<SceneGate>,
    event_capacity: Option<usize>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn disc_count(mut self, disc_count: u8) -> Self {
        self.config.disc_count = disc_count;
        self
    }

    pub fn disc_speed(mut self, tick: Duration) -> Self {
        self.config.disc_speed_ms = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Draw onto the scene behind an existing gate (required, unless
    /// [`spawn_gate`](Self::spawn_gate) is used).
    pub fn gate(mut self, gate: SceneGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Draw onto a fresh scene owned by a dedicated thread.
    pub fn spawn_gate(mut self) -> Result<Self, BuildError> {
        self.gate = Some(DispatchGate::spawn(Scene::new())?);
        Ok(self)
    }

    /// Capacity of the event broadcast channel.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Build the simulation.
    /// Returns an error if the gate is missing or the configuration is invalid.
    pub fn build(self) -> Result<Simulation, BuildError> {
        let gate = self.gate.ok_or(BuildError::MissingGate)?;
        let events = self
            .event_capacity
            .map_or_else(EventEmitter::new, EventEmitter::with_capacity);
        Ok(Simulation::with_emitter(self.config, gate, events)?)
    }
}
