//! Errors that can occur while matching.
//!
//! Not finding a match is not an error: searches return `Ok(None)`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The state-visit budget ran out.
    #[error("Complexity requirements exceeded.")]
    Complexity,

    /// Too many pending checkpoints or nested recursions.
    #[error("Out of stack space.")]
    Stack,

    /// The expression failed to compile and cannot run searches.
    #[error("Invalid regular expression used for matching.")]
    InvalidPattern,
}

impl RuntimeError {
    /// Stable snake_case code, shared with compile error codes.
    pub fn code(self) -> &'static str {
        match self {
            Self::Complexity => "complexity",
            Self::Stack => "stack",
            Self::InvalidPattern => "bad_pattern",
        }
    }
}
