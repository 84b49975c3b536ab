//! Dispatch gate errors.

use thiserror::Error;

/// Errors that can occur when marshalling work onto the owning thread
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GateError {
    /// The owner loop has stopped running queued work
    #[error("Owning context is no longer accepting work")]
    Closed,
}
