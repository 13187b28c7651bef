use drill_core::model::LEVELS;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCardVm {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

#[must_use]
pub fn map_level_cards() -> Vec<LevelCardVm> {
    LEVELS
        .iter()
        .map(|info| LevelCardVm {
            id: info.id.value(),
            title: info.title,
            description: info.description,
            example: info.example,
        })
        .collect()
}
