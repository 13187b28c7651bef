use thiserror::Error;

use crate::model::{AnswerParseError, FractionError, LevelError};
use crate::scratchpad::ScratchpadError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fraction(#[from] FractionError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Answer(#[from] AnswerParseError),
    #[error(transparent)]
    Scratchpad(#[from] ScratchpadError),
}
