//! Configuration errors.

use thiserror::Error;

/// A single rule broken by a configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("Disc count {0} outside 1..=7")]
    InvalidDiscCount(u8),

    #[error("Disc speed must be a positive number of milliseconds")]
    InvalidDiscSpeed,
}

/// Errors that can occur when loading or validating a configuration
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Every violated rule, not just the first one
    #[error("Invalid configuration: {}", describe(.0))]
    Invalid(Vec<ConfigViolation>),

    /// The configuration document could not be parsed
    #[error("Configuration parse failed: {0}")]
    Parse(String),

    /// An environment override is not a number
    #[error("Environment override {name}={value:?} is not a number")]
    Override { name: &'static str, value: String },
}

fn describe(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
