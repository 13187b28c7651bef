#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The generator produced no problems for the selected level.
    EmptyBatch,
    /// The route named a level that does not exist.
    UnknownLevel,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyBatch => "無法載入題目，請返回並重試。",
            Self::UnknownLevel => "找不到這個等級。",
        }
    }
}
