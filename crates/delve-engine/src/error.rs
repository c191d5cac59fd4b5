//! Error types for the progression engine.

use delve_core::CoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine. None of them are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A session or action id does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration the engine needs is missing: no active reward table, or
    /// no active rooms.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The caller passed a value the engine does not understand.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller acted on a session that cannot continue.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The persistence back-end failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownActionType(_) | CoreError::UnknownRoomCategory(_) => {
                Self::InvalidArgument(err.to_string())
            }
            CoreError::InvalidRange { .. }
            | CoreError::InvalidRoomCount(_)
            | CoreError::InvalidStartingHealth(_) => Self::PreconditionFailed(err.to_string()),
        }
    }
}
