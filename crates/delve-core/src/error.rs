/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or parsing core values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A reward range whose lower bound exceeds its upper bound.
    #[error("invalid range for {field}: min {min} > max {max}")]
    InvalidRange {
        /// Name of the offending reward field.
        field: &'static str,
        /// The lower bound.
        min: i32,
        /// The upper bound.
        max: i32,
    },

    /// A reward table that would generate sessions without rooms.
    #[error("invalid room count: {0} (must be at least 1)")]
    InvalidRoomCount(u32),

    /// A starting health outside `1..=MAX_HEALTH`.
    #[error("invalid starting health: {0}")]
    InvalidStartingHealth(i32),

    /// An action name that is not combat, search, or flee.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    /// A room category name that is not combat or search.
    #[error("unknown room category: {0}")]
    UnknownRoomCategory(String),
}
