mod level_vm;
mod practice_vm;
mod scratchpad_vm;

pub use level_vm::{LevelCardVm, map_level_cards};
pub use practice_vm::{
    AnswerField, FeedbackVm, PracticeIntent, PracticeVm, ProblemCardVm, feedback_for,
    start_practice,
};
pub use scratchpad_vm::{ColorSwatchVm, ScratchpadVm};
