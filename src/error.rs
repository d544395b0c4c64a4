use thiserror::Error;

use crate::state::Phase;

/// Errors reported by the rotator. None of them are fatal: a rotator that
/// fails to start simply never shows a second slide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotatorError {
    #[error("too few slides: {count} (at least 2 are needed)")]
    TooFewSlides { count: usize },

    #[error("slide index {index} out of range for {len} slides")]
    OutOfRange { index: i64, len: usize },

    #[error("unknown transition: {0}")]
    UnknownTransition(String),

    #[error("not allowed while the rotator is {0:?}")]
    WrongPhase(Phase),

    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl RotatorError {
    pub fn out_of_range(index: i64, len: usize) -> Self {
        RotatorError::OutOfRange { index, len }
    }
}
