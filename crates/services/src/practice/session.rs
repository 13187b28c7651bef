use drill_core::model::{CheckState, LevelId, Problem, UserAnswer, check_answer};

use super::progress::PracticeProgress;
use crate::error::PracticeError;

//
// ─── ITEM VIEW ─────────────────────────────────────────────────────────────────
//

/// Borrowed view of one problem together with its answer and check state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeItem<'a> {
    pub index: usize,
    pub problem: &'a Problem,
    pub answer: UserAnswer,
    pub check: CheckState,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One batch of problems with the learner's answers and per-problem check states.
///
/// The three vectors are created together, always have the same length, and are
/// replaced together when a new batch is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    level: LevelId,
    problems: Vec<Problem>,
    answers: Vec<UserAnswer>,
    checks: Vec<CheckState>,
}

impl PracticeSession {
    #[must_use]
    pub fn new(level: LevelId, problems: Vec<Problem>) -> Self {
        let len = problems.len();
        Self {
            level,
            problems,
            answers: vec![UserAnswer::empty(); len],
            checks: vec![CheckState::Unchecked; len],
        }
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<UserAnswer> {
        self.answers.get(index).copied()
    }

    #[must_use]
    pub fn check_state(&self, index: usize) -> Option<CheckState> {
        self.checks.get(index).copied()
    }

    #[must_use]
    pub fn check_states(&self) -> &[CheckState] {
        &self.checks
    }

    pub fn items(&self) -> impl Iterator<Item = PracticeItem<'_>> {
        self.problems
            .iter()
            .zip(&self.answers)
            .zip(&self.checks)
            .enumerate()
            .map(|(index, ((problem, answer), check))| PracticeItem {
                index,
                problem,
                answer: *answer,
                check: *check,
            })
    }

    /// Records a new answer; the problem's check state goes back to `Unchecked`.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::IndexOutOfRange` for an index outside the batch.
    pub fn set_answer(&mut self, index: usize, answer: UserAnswer) -> Result<(), PracticeError> {
        let len = self.len();
        let slot = self
            .answers
            .get_mut(index)
            .ok_or(PracticeError::IndexOutOfRange { index, len })?;
        *slot = answer;
        self.checks[index] = CheckState::Unchecked;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PracticeError::IndexOutOfRange` for an index outside the batch.
    pub fn set_numerator(&mut self, index: usize, value: Option<i64>) -> Result<(), PracticeError> {
        let current = self.answer_or_err(index)?;
        self.set_answer(index, current.with_numerator(value))
    }

    /// # Errors
    ///
    /// Returns `PracticeError::IndexOutOfRange` for an index outside the batch.
    pub fn set_denominator(
        &mut self,
        index: usize,
        value: Option<i64>,
    ) -> Result<(), PracticeError> {
        let current = self.answer_or_err(index)?;
        self.set_answer(index, current.with_denominator(value))
    }

    /// Recomputes every check state from the current answers.
    pub fn check_all(&mut self) -> PracticeProgress {
        self.checks = evaluate(&self.problems, &self.answers);
        self.progress()
    }

    #[must_use]
    pub fn progress(&self) -> PracticeProgress {
        let count = |state: CheckState| self.checks.iter().filter(|c| **c == state).count();
        PracticeProgress {
            total: self.len(),
            answered: self.answers.iter().filter(|a| a.is_complete()).count(),
            correct: count(CheckState::Correct),
            incorrect: count(CheckState::Incorrect),
        }
    }

    fn answer_or_err(&self, index: usize) -> Result<UserAnswer, PracticeError> {
        self.answer(index).ok_or(PracticeError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }
}

/// Check states for a batch, derived purely from problems and answers.
#[must_use]
pub fn evaluate(problems: &[Problem], answers: &[UserAnswer]) -> Vec<CheckState> {
    problems
        .iter()
        .zip(answers)
        .map(|(problem, answer)| check_answer(answer, problem.answer()))
        .collect()
}

#[cfg(test)]
mod tests {
    use drill_core::model::reduce;

    use super::*;

    fn session() -> PracticeSession {
        PracticeSession::new(
            LevelId::new(1).unwrap(),
            vec![
                Problem::new("a", reduce(1, 2)),
                Problem::new("b", reduce(-2, 3)),
                Problem::new("c", reduce(0, 5)),
            ],
        )
    }

    #[test]
    fn new_session_starts_empty_and_unchecked() {
        let s = session();
        assert_eq!(s.len(), 3);
        assert!(s.items().all(|item| item.answer.is_empty()));
        assert!(s.check_states().iter().all(|c| *c == CheckState::Unchecked));
    }

    #[test]
    fn check_all_grades_each_problem() {
        let mut s = session();
        s.set_answer(0, UserAnswer::new(2, 4)).unwrap();
        s.set_answer(1, UserAnswer::new(2, -3)).unwrap();
        s.set_numerator(2, Some(0)).unwrap();

        let progress = s.check_all();

        assert_eq!(
            s.check_states(),
            &[CheckState::Correct, CheckState::Correct, CheckState::Incorrect]
        );
        assert_eq!(progress.correct, 2);
        assert_eq!(progress.incorrect, 1);
        assert_eq!(progress.answered, 2);
        assert!(progress.is_fully_checked());
    }

    #[test]
    fn editing_an_answer_resets_only_that_problem() {
        let mut s = session();
        s.set_answer(0, UserAnswer::new(1, 2)).unwrap();
        s.set_answer(1, UserAnswer::new(1, 2)).unwrap();
        s.check_all();

        s.set_denominator(0, Some(3)).unwrap();

        assert_eq!(s.check_state(0), Some(CheckState::Unchecked));
        assert_eq!(s.check_state(1), Some(CheckState::Incorrect));
        assert_eq!(s.answer(0), Some(UserAnswer::new(1, 3)));
        assert!(!s.progress().is_fully_checked());
    }

    #[test]
    fn out_of_range_edit_is_an_error() {
        let mut s = session();
        assert_eq!(
            s.set_answer(3, UserAnswer::new(1, 1)),
            Err(PracticeError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(s.set_numerator(9, Some(1)).is_err());
    }

    #[test]
    fn empty_batch_has_empty_progress() {
        let mut s = PracticeSession::new(LevelId::new(2).unwrap(), Vec::new());
        assert!(s.is_empty());
        let progress = s.check_all();
        assert_eq!(progress.total, 0);
        assert!(!progress.is_fully_checked());
    }
}
