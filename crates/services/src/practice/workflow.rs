use std::fmt;
use std::sync::Arc;

use drill_core::model::LevelId;
use tracing::{info, warn};

use super::session::PracticeSession;
use crate::error::PracticeError;
use crate::problem_generator::{ProblemGenerator, RandomSource, RngSource};

/// Produces a fresh random source for each batch.
pub type SourceFactory = Arc<dyn Fn() -> Box<dyn RandomSource> + Send + Sync>;

/// Orchestrates batch generation for practice sessions.
#[derive(Clone)]
pub struct PracticeLoopService {
    sources: SourceFactory,
}

impl PracticeLoopService {
    /// Service backed by the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RngSource::thread)
    }

    /// Service whose batches draw from a fresh `make()` source each time.
    #[must_use]
    pub fn with_source<S, F>(make: F) -> Self
    where
        S: RandomSource + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self::with_source_factory(Arc::new(move || -> Box<dyn RandomSource> {
            Box::new(make())
        }))
    }

    #[must_use]
    pub fn with_source_factory(sources: SourceFactory) -> Self {
        Self { sources }
    }

    /// Start a session with a fresh batch for `level`.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` when the generator produced no problems.
    pub fn start(&self, level: LevelId) -> Result<PracticeSession, PracticeError> {
        let mut generator = ProblemGenerator::with_source((self.sources)());
        let problems = generator.generate(level);
        if problems.is_empty() {
            warn!(%level, "generator produced an empty batch");
            return Err(PracticeError::Empty(level));
        }
        info!(%level, count = problems.len(), "started practice batch");
        Ok(PracticeSession::new(level, problems))
    }

    /// Replace the current batch with a new one for the same level.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` when the generator produced no problems.
    pub fn next_batch(&self, current: &PracticeSession) -> Result<PracticeSession, PracticeError> {
        self.start(current.level())
    }
}

impl Default for PracticeLoopService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PracticeLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeLoopService").finish_non_exhaustive()
    }
}
