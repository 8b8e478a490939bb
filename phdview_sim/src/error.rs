//! Error types for the simulation harness.

use phdview_core::PhdViewError;
use thiserror::Error;

/// Errors raised while generating a scenario or running a playback script.
#[derive(Debug, Error)]
pub enum SimError {
    /// Playback core rejected an operation
    #[error(transparent)]
    Core(#[from] PhdViewError),

    /// Navigation script could not be parsed
    #[error("Bad navigation command: {0}")]
    Command(String),

    /// Scenario parameters are unusable
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// Config or export file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Creates a command error.
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Creates a scenario error.
    pub fn scenario(msg: impl Into<String>) -> Self {
        Self::Scenario(msg.into())
    }
}
