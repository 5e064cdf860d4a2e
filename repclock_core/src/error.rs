//! Error types for the repclock_core library.

use crate::types::SessionPhase;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for repclock_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Intent is not valid for the current session phase
    #[error("Invalid transition: cannot {intent} while {phase:?}")]
    InvalidTransition {
        phase: SessionPhase,
        intent: &'static str,
    },

    /// Malformed elapsed time or weight for a unit
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    /// Advance requested past the end of the exercise queue
    #[error("No more exercises in today's routine")]
    NoMoreExercises,

    /// An exercise report was finalized twice
    #[error("Report for exercise '{exercise_id}' was already finalized")]
    AlreadyFinalized { exercise_id: String },

    /// Exercise configuration violates the unit invariants
    #[error("Invalid exercise: {0}")]
    InvalidExercise(String),

    /// A session was built from an empty exercise queue
    #[error("Routine contains no exercises")]
    EmptyRoutine,

    /// Routine file could not be loaded
    #[error("Routine error: {0}")]
    Routine(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the caller can retry with a different intent or input.
    ///
    /// `AlreadyFinalized` points at a caller bug and is the only engine
    /// error reported as non-recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::AlreadyFinalized { .. })
    }
}
