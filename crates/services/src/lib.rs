#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod practice;
pub mod problem_generator;
pub mod typeset;

pub use config::PracticeConfig;
pub use error::{GenerateError, PracticeError, TypesetError};
pub use practice::{
    PracticeItem, PracticeLoopService, PracticeProgress, PracticeSession, SourceFactory,
};
pub use problem_generator::{BATCH_SIZE, ProblemGenerator, RandomSource, RngSource};
pub use typeset::{
    FallbackReason, TypesetBackend, TypesetOutcome, TypesetPolicy, typeset_with_fallback,
};
