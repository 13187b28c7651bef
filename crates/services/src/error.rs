//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{FractionError, LevelError, LevelId};

/// Errors raised inside a level strategy. `ProblemGenerator::generate` turns these
/// into an empty batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerateError {
    #[error("arithmetic overflow while building a level {level} problem")]
    Overflow { level: LevelId },
    #[error(transparent)]
    Fraction(#[from] FractionError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Errors emitted by practice sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("no problems could be generated for level {0}")]
    Empty(LevelId),
    #[error("problem index {index} is out of range for a batch of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors reported by a typesetting backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TypesetError {
    #[error("typesetting target {0} not found")]
    MissingTarget(String),
    #[error("renderer rejected expression: {0}")]
    Rejected(String),
}
