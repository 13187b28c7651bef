use drill_core::model::{CheckState, LevelId, UserAnswer};
use services::{PracticeError, PracticeLoopService, PracticeSession};
use tracing::warn;

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerField {
    Numerator,
    Denominator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PracticeIntent {
    Edit {
        index: usize,
        field: AnswerField,
        raw: String,
    },
    Check,
    NewBatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub icon: &'static str,
    pub class: &'static str,
}

#[must_use]
pub fn feedback_for(state: CheckState) -> FeedbackVm {
    match state {
        CheckState::Correct => FeedbackVm {
            icon: "✔",
            class: "problem problem--correct",
        },
        CheckState::Incorrect => FeedbackVm {
            icon: "✘",
            class: "problem problem--incorrect",
        },
        CheckState::Unchecked => FeedbackVm {
            icon: "=",
            class: "problem",
        },
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemCardVm {
    pub index: usize,
    pub label: String,
    pub expression: String,
    pub numerator: String,
    pub denominator: String,
    pub feedback: FeedbackVm,
    /// Markup of the expected answer, present only after an incorrect check.
    pub correct_answer: Option<String>,
}

/// Raw input box text; kept so partial input such as `-` survives a re-render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Draft {
    numerator: String,
    denominator: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeVm {
    session: PracticeSession,
    drafts: Vec<Draft>,
    error: Option<ViewError>,
}

impl PracticeVm {
    fn from_start(level: LevelId, started: Result<PracticeSession, PracticeError>) -> Self {
        match started {
            Ok(session) => Self {
                drafts: vec![Draft::default(); session.len()],
                session,
                error: None,
            },
            Err(err) => {
                warn!(%level, %err, "showing empty practice batch");
                Self {
                    session: PracticeSession::new(level, Vec::new()),
                    drafts: Vec::new(),
                    error: Some(ViewError::EmptyBatch),
                }
            }
        }
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        self.session.level()
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.level().info().title
    }

    #[must_use]
    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    #[must_use]
    pub fn error(&self) -> Option<ViewError> {
        self.error
    }

    #[must_use]
    pub fn can_check(&self) -> bool {
        !self.session.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> Vec<ProblemCardVm> {
        self.session
            .items()
            .zip(&self.drafts)
            .map(|(item, draft)| ProblemCardVm {
                index: item.index,
                label: format!("第 {} 題", item.index + 1),
                expression: item.problem.expression().to_string(),
                numerator: draft.numerator.clone(),
                denominator: draft.denominator.clone(),
                feedback: feedback_for(item.check),
                correct_answer: (item.check == CheckState::Incorrect)
                    .then(|| item.problem.answer().to_latex()),
            })
            .collect()
    }

    /// Score line once at least one problem has been checked.
    #[must_use]
    pub fn score_label(&self) -> Option<String> {
        let progress = self.session.progress();
        (progress.correct + progress.incorrect > 0)
            .then(|| format!("答對 {} / {} 題", progress.correct, progress.total))
    }

    pub fn apply(&mut self, practice_loop: &PracticeLoopService, intent: PracticeIntent) {
        match intent {
            PracticeIntent::Edit { index, field, raw } => self.edit(index, field, raw),
            PracticeIntent::Check => {
                self.session.check_all();
            }
            PracticeIntent::NewBatch => {
                let level = self.level();
                *self = Self::from_start(level, practice_loop.next_batch(&self.session));
            }
        }
    }

    fn edit(&mut self, index: usize, field: AnswerField, raw: String) {
        let Some(draft) = self.drafts.get_mut(index) else {
            warn!(index, "edit for a problem outside the batch");
            return;
        };
        let value = UserAnswer::parse_field(&raw);
        let result = match field {
            AnswerField::Numerator => {
                draft.numerator = raw;
                self.session.set_numerator(index, value)
            }
            AnswerField::Denominator => {
                draft.denominator = raw;
                self.session.set_denominator(index, value)
            }
        };
        if let Err(err) = result {
            warn!(%err, "answer edit rejected");
        }
    }
}

/// Start a practice screen for `level`.
///
/// An empty batch still yields a view-model; it carries `ViewError::EmptyBatch`.
#[must_use]
pub fn start_practice(practice_loop: &PracticeLoopService, level: LevelId) -> PracticeVm {
    PracticeVm::from_start(level, practice_loop.start(level))
}

#[cfg(test)]
mod tests {
    use services::{RandomSource, RngSource};

    use super::*;

    struct Overflowing;

    impl RandomSource for Overflowing {
        fn int_in(&mut self, _min: i64, _max: i64) -> i64 {
            i64::MAX
        }

        fn coin(&mut self) -> bool {
            false
        }
    }

    fn edit(index: usize, field: AnswerField, raw: &str) -> PracticeIntent {
        PracticeIntent::Edit {
            index,
            field,
            raw: raw.to_string(),
        }
    }

    #[test]
    fn edits_keep_raw_text_and_reset_feedback() {
        let practice_loop = PracticeLoopService::new();
        let mut vm = start_practice(&practice_loop, LevelId::new(2).unwrap());
        assert_eq!(vm.cards().len(), 3);

        vm.apply(&practice_loop, edit(0, AnswerField::Numerator, "-"));
        vm.apply(&practice_loop, PracticeIntent::Check);
        assert_eq!(vm.cards()[0].feedback.icon, "✘");
        assert!(vm.cards()[0].correct_answer.is_some());

        vm.apply(&practice_loop, edit(0, AnswerField::Numerator, "-3"));
        let cards = vm.cards();
        let card = &cards[0];
        assert_eq!(card.numerator, "-3");
        assert_eq!(card.feedback, feedback_for(CheckState::Unchecked));
        assert_eq!(card.correct_answer, None);
        assert_eq!(vm.session().answer(0).unwrap().numerator, Some(-3));
    }

    #[test]
    fn correct_answers_score_and_show_no_hint() {
        let practice_loop = PracticeLoopService::new();
        let mut vm = start_practice(&practice_loop, LevelId::new(4).unwrap());
        assert_eq!(vm.score_label(), None);

        let answers: Vec<_> = vm
            .session()
            .problems()
            .iter()
            .map(|problem| problem.answer())
            .collect();
        for (index, answer) in answers.iter().enumerate() {
            let n = (answer.numerator() * 2).to_string();
            let d = (answer.denominator() * 2).to_string();
            vm.apply(&practice_loop, edit(index, AnswerField::Numerator, &n));
            vm.apply(&practice_loop, edit(index, AnswerField::Denominator, &d));
        }
        vm.apply(&practice_loop, PracticeIntent::Check);

        assert!(vm.cards().iter().all(|card| card.feedback.icon == "✔"));
        assert!(vm.cards().iter().all(|card| card.correct_answer.is_none()));
        assert_eq!(vm.score_label().as_deref(), Some("答對 3 / 3 題"));
    }

    #[test]
    fn new_batch_clears_drafts() {
        let practice_loop = PracticeLoopService::new();
        let mut vm = start_practice(&practice_loop, LevelId::new(1).unwrap());
        vm.apply(&practice_loop, edit(1, AnswerField::Denominator, "7"));
        vm.apply(&practice_loop, PracticeIntent::NewBatch);

        assert_eq!(vm.level(), LevelId::new(1).unwrap());
        assert!(vm.cards().iter().all(|card| card.denominator.is_empty()));
        assert_eq!(vm.score_label(), None);
    }

    #[test]
    fn empty_batch_disables_checking() {
        let practice_loop = PracticeLoopService::with_source(|| Overflowing);
        let vm = start_practice(&practice_loop, LevelId::new(4).unwrap());
        assert_eq!(vm.error(), Some(ViewError::EmptyBatch));
        assert!(!vm.can_check());
        assert!(vm.cards().is_empty());
    }

    #[test]
    fn out_of_range_edit_is_ignored() {
        let practice_loop = PracticeLoopService::with_source(RngSource::thread);
        let mut vm = start_practice(&practice_loop, LevelId::new(5).unwrap());
        let before = vm.clone();
        vm.apply(&practice_loop, edit(9, AnswerField::Numerator, "1"));
        assert_eq!(vm, before);
    }
}
