/// Aggregated view of a batch, useful for the score line in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeProgress {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl PracticeProgress {
    /// True once every problem carries a check result.
    #[must_use]
    pub fn is_fully_checked(&self) -> bool {
        self.total > 0 && self.correct + self.incorrect == self.total
    }
}
