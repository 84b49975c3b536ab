//! Simulation configuration.
//!
//! Configuration is layered, lowest priority first:
//! 1. **Compiled defaults**: [`SimulationConfig::default()`]
//! 2. **JSON document**: [`SimulationConfig::from_json_str`]
//! 3. **Environment variables**: `HANOI_DISCS`, `HANOI_DISC_SPEED_MS`
//!
//! Validation uses Stillwater's `Validation` so that a configuration with
//! several problems reports all of them at once.
//!
//! # Example
//!
//! ```rust
//! use hanoi_motion::config::{ConfigError, SimulationConfig};
//!
//! let config = SimulationConfig::from_json_str(r#"{ "disc_count": 5 }"#).unwrap();
//! assert_eq!(config.disc_count, 5);
//! assert_eq!(config.disc_speed_ms, 50);
//!
//! let err = SimulationConfig::from_json_str(r#"{ "disc_count": 9, "disc_speed_ms": 0 }"#)
//!     .unwrap_err();
//! assert!(matches!(err, ConfigError::Invalid(v) if v.len() == 2));
//! ```

pub mod error;

pub use error::{ConfigError, ConfigViolation};

use crate::core::MAX_DISCS;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Environment variable overriding the disc count.
pub const DISC_COUNT_ENV: &str = "HANOI_DISCS";

/// Environment variable overriding the tick duration in milliseconds.
pub const DISC_SPEED_ENV: &str = "HANOI_DISC_SPEED_MS";

/// Tick durations offered to users, in milliseconds.
pub const SPEED_PRESETS: [u64; 5] = [10, 50, 75, 100, 150];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of discs seeded on the left peg (1..=7).
    pub disc_count: u8,
    /// Duration of one animation tick, in milliseconds.
    pub disc_speed_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            disc_count: 4,
            disc_speed_ms: 50,
        }
    }
}

impl SimulationConfig {
    pub fn disc_speed(&self) -> Duration {
        Duration::from_millis(self.disc_speed_ms)
    }

    /// Parse a JSON document over the defaults and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    /// Apply `HANOI_*` environment overrides and validate the result.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup(DISC_COUNT_ENV) {
            self.disc_count = value.trim().parse().map_err(|_| ConfigError::Override {
                name: DISC_COUNT_ENV,
                value,
            })?;
        }
        if let Some(value) = lookup(DISC_SPEED_ENV) {
            self.disc_speed_ms = value.trim().parse().map_err(|_| ConfigError::Override {
                name: DISC_SPEED_ENV,
                value,
            })?;
        }
        self.validate()
    }

    /// Check every rule, accumulating ALL violations.
    pub fn check(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        let disc_check = if (1..=MAX_DISCS).contains(&self.disc_count) {
            Validation::success(())
        } else {
            Validation::fail(ConfigViolation::InvalidDiscCount(self.disc_count))
        };
        checks.push(disc_check);

        let speed_check = if self.disc_speed_ms > 0 {
            Validation::success(())
        } else {
            Validation::fail(ConfigViolation::InvalidDiscSpeed)
        };
        checks.push(speed_check);

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        match self.check() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(violations) => Err(ConfigError::Invalid(
                violations.iter().cloned().collect(),
            )),
        }
    }
}

/// Accept a disc count for seeding a simulation.
pub fn validate_disc_count(disc_count: u8) -> Result<u8, ConfigError> {
    if (1..=MAX_DISCS).contains(&disc_count) {
        Ok(disc_count)
    } else {
        Err(ConfigError::Invalid(vec![ConfigViolation::InvalidDiscCount(
            disc_count,
        )]))
    }
}
